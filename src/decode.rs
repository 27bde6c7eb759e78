// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! Envelope decoding for enrollment responses.
//!
//! A CA answers either with the raw DER certificate (`application/pkix-cert`)
//! or with a degenerate PKCS#7 SignedData envelope (`application/pkcs7-mime`)
//! carrying the issued leaf next to CA certificates, possibly Base64-wrapped
//! for transport. This module turns both shapes into the single non-CA leaf
//! certificate in DER form.

use base64::prelude::*;
use cms::content_info::ContentInfo;
use cms::signed_data::SignedData;
use const_oid::db::rfc5280::ID_CE_BASIC_CONSTRAINTS;
use const_oid::db::rfc5911::ID_SIGNED_DATA;
use der::{Decode, Encode};
use x509_cert::ext::pkix::BasicConstraints;
use x509_cert::Certificate;

use crate::error::{EnrollError, Result};
use crate::types::{content_types, IssuedCertificate};

/// Decode an enrollment response into the issued leaf certificate.
///
/// Dispatches on the declared media type; parameters after `;` are ignored
/// and matching is case-insensitive. `application/pkix-cert` bodies are
/// returned unchanged and never parsed as PKCS#7.
pub fn decode(body: &[u8], media_type: &str) -> Result<IssuedCertificate> {
    match normalize_media_type(media_type).as_str() {
        content_types::PKIX_CERT => Ok(IssuedCertificate::from_der(body)),
        content_types::PKCS7_MIME => decode_pkcs7(body),
        _ => Err(EnrollError::unsupported_media_type(media_type)),
    }
}

/// Strip parameters and fold case: `Application/PKCS7-Mime; smime-type=...`
/// becomes `application/pkcs7-mime`.
fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Decode a PKCS#7 SignedData envelope down to its single leaf certificate.
fn decode_pkcs7(body: &[u8]) -> Result<IssuedCertificate> {
    // Base64 transport wrapping heuristic: DER SignedData begins with a
    // SEQUENCE tag (0x30), whose Base64 text encoding begins with 'M'.
    let der_bytes = if body.first() == Some(&b'M') {
        decode_base64(body)?
    } else {
        body.to_vec()
    };

    let content_info = ContentInfo::from_der(&der_bytes)
        .map_err(|e| EnrollError::cms_parsing(format!("Failed to parse ContentInfo: {}", e)))?;

    let signed_data = extract_signed_data(&content_info)?;
    let certificates = extract_certificates(&signed_data)?;

    select_leaf(certificates)
}

/// Decode Base64 text, tolerating line breaks and other whitespace.
fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    BASE64_STANDARD.decode(&cleaned).map_err(EnrollError::Base64)
}

fn extract_signed_data(content_info: &ContentInfo) -> Result<SignedData> {
    if content_info.content_type != ID_SIGNED_DATA {
        return Err(EnrollError::cms_parsing(format!(
            "Expected SignedData OID {}, got {}",
            ID_SIGNED_DATA, content_info.content_type
        )));
    }

    let content = content_info
        .content
        .to_der()
        .map_err(|e| EnrollError::cms_parsing(format!("Failed to encode content: {}", e)))?;

    SignedData::from_der(&content)
        .map_err(|e| EnrollError::cms_parsing(format!("Failed to parse SignedData: {}", e)))
}

fn extract_certificates(signed_data: &SignedData) -> Result<Vec<Certificate>> {
    let cert_set = match &signed_data.certificates {
        Some(certs) => certs,
        None => return Ok(Vec::new()),
    };

    let mut certificates = Vec::new();

    for cert_choice in cert_set.0.iter() {
        // Only standard X.509 certificates are considered; other
        // CertificateChoices variants carry no issued leaf.
        let cert_der = cert_choice
            .to_der()
            .map_err(|e| EnrollError::cms_parsing(format!("Failed to encode certificate: {}", e)))?;

        match Certificate::from_der(&cert_der) {
            Ok(cert) => certificates.push(cert),
            Err(e) => {
                tracing::warn!("Skipping non-X.509 entry in certificate set: {}", e);
            }
        }
    }

    Ok(certificates)
}

/// Select the single non-CA certificate from the envelope.
///
/// Zero or more than one candidate is a hard error; the decoder never guesses
/// which certificate is the issued leaf.
fn select_leaf(certificates: Vec<Certificate>) -> Result<IssuedCertificate> {
    let mut leaves = Vec::new();

    for cert in certificates {
        if !is_ca_certificate(&cert)? {
            leaves.push(cert);
        }
    }

    if leaves.len() != 1 {
        return Err(EnrollError::ambiguous_leaf(leaves.len()));
    }

    let leaf_der = leaves[0]
        .to_der()
        .map_err(|e| EnrollError::certificate_parsing(format!("Failed to encode leaf: {}", e)))?;

    Ok(IssuedCertificate::from_der(leaf_der))
}

/// CA status per the Basic Constraints extension.
///
/// A missing extension or `ca == false` both mean leaf.
fn is_ca_certificate(cert: &Certificate) -> Result<bool> {
    let extensions = match &cert.tbs_certificate.extensions {
        Some(exts) => exts,
        None => return Ok(false),
    };

    for ext in extensions.iter() {
        if ext.extn_id == ID_CE_BASIC_CONSTRAINTS {
            let constraints =
                BasicConstraints::from_der(ext.extn_value.as_bytes()).map_err(|e| {
                    EnrollError::certificate_parsing(format!(
                        "Invalid Basic Constraints extension: {}",
                        e
                    ))
                })?;
            return Ok(constraints.ca);
        }
    }

    Ok(false)
}
