// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use cms::cert::CertificateChoices;
use cms::content_info::{CmsVersion, ContentInfo};
use cms::signed_data::{CertificateSet, EncapsulatedContentInfo, SignedData, SignerInfos};
use const_oid::db::rfc5911::{ID_DATA, ID_SIGNED_DATA};
use der::asn1::SetOfVec;
use der::{Any, Decode, Encode};
use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair, PKCS_ECDSA_P256_SHA256};
use wiremock::{Match, Request};

use ca_enroll_client::ClientIdentity;

/// Self-signed end-entity certificate with `basicConstraints CA:FALSE`.
pub fn leaf_cert_der(cn: &str) -> Vec<u8> {
    let key = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.is_ca = IsCa::ExplicitNoCa;
    params.self_signed(&key).unwrap().der().to_vec()
}

/// Self-signed CA certificate.
pub fn ca_cert_der(cn: &str) -> Vec<u8> {
    let key = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.self_signed(&key).unwrap().der().to_vec()
}

/// End-entity certificate issued to the given key pair by a throwaway CA.
pub fn issue_leaf_for(subject_key: &KeyPair, cn: &str) -> Vec<u8> {
    let issuer_key = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
    let mut issuer_params = CertificateParams::default();
    issuer_params
        .distinguished_name
        .push(DnType::CommonName, "Issuing CA");
    issuer_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let issuer_cert = issuer_params.self_signed(&issuer_key).unwrap();

    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.is_ca = IsCa::ExplicitNoCa;
    params
        .signed_by(subject_key, &issuer_cert, &issuer_key)
        .unwrap()
        .der()
        .to_vec()
}

/// Degenerate certs-only PKCS#7 SignedData envelope around the given
/// certificates, as CAs return it from EST endpoints.
pub fn certs_only_envelope(cert_ders: &[&[u8]]) -> Vec<u8> {
    let mut choices = Vec::new();
    for der in cert_ders {
        let cert = x509_cert::Certificate::from_der(der).unwrap();
        choices.push(CertificateChoices::Certificate(cert));
    }

    let signed_data = SignedData {
        version: CmsVersion::V1,
        digest_algorithms: SetOfVec::new(),
        encap_content_info: EncapsulatedContentInfo {
            econtent_type: ID_DATA,
            econtent: None,
        },
        certificates: Some(CertificateSet(SetOfVec::try_from(choices).unwrap())),
        crls: None,
        signer_infos: SignerInfos(SetOfVec::new()),
    };

    let content_info = ContentInfo {
        content_type: ID_SIGNED_DATA,
        content: Any::encode_from(&signed_data).unwrap(),
    };
    content_info.to_der().unwrap()
}

/// Freshly generated TLS client identity for re-enrollment runs.
pub fn client_identity() -> ClientIdentity {
    let key = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::CommonName, "old-client");
    let cert = params.self_signed(&key).unwrap();
    ClientIdentity::new(cert.pem().into_bytes(), key.serialize_pem().into_bytes())
}

/// Matches only requests carrying no Authorization header.
pub struct NoAuthorizationHeader;

impl Match for NoAuthorizationHeader {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}
