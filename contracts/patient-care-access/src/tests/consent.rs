#![cfg(test)]

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, Env, String,
};

use super::utils::*;
use crate::{AccessError, ConsentStatus};

#[test]
fn test_request_creates_pending_consent() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    let consent_id = request_consent(&contract, &env, &hospital, &patient);

    let consent = contract.get_consent(&consent_id);
    assert_eq!(consent.status, ConsentStatus::Pending);
    assert_eq!(consent.patient, patient);
    assert_eq!(consent.hospital, hospital);
    assert!(consent.responded_at.is_none());
    assert!(consent.revoked_at.is_none());
}

#[test]
fn test_request_snapshots_patient_fields() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    let claimed_name = String::from_str(&env, "A. Rao");
    let claimed_phone = String::from_str(&env, "+910000000000");
    let consent_id = contract.request_consent(&hospital, &patient, &claimed_name, &claimed_phone);

    // The snapshot records what the hospital claimed, not the registry values
    let consent = contract.get_consent(&consent_id);
    assert_eq!(consent.patient_name, claimed_name);
    assert_eq!(consent.patient_phone, claimed_phone);
}

#[test]
fn test_duplicate_pending_request_conflicts() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    request_consent(&contract, &env, &hospital, &patient);

    let result = contract.try_request_consent(
        &hospital,
        &patient,
        &String::from_str(&env, "Asha Rao"),
        &String::from_str(&env, "+911234567890"),
    );
    assert_eq!(result, Err(Ok(AccessError::ConsentAlreadyOpen)));
}

#[test]
fn test_request_while_granted_conflicts() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    grant_consent(&contract, &env, &hospital, &patient);

    let result = contract.try_request_consent(
        &hospital,
        &patient,
        &String::from_str(&env, "Asha Rao"),
        &String::from_str(&env, "+911234567890"),
    );
    assert_eq!(result, Err(Ok(AccessError::ConsentAlreadyOpen)));
}

#[test]
fn test_pairs_are_independent() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let other_hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    request_consent(&contract, &env, &hospital, &patient);
    // A different hospital may still open its own request
    let consent_id = request_consent(&contract, &env, &other_hospital, &patient);
    assert_eq!(
        contract.get_consent(&consent_id).status,
        ConsentStatus::Pending
    );
}

#[test]
fn test_grant_sets_status_and_timestamp() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(5_000);

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    let consent_id = request_consent(&contract, &env, &hospital, &patient);

    env.ledger().set_timestamp(6_000);
    contract.respond_consent(&patient, &consent_id, &true);

    let consent = contract.get_consent(&consent_id);
    assert_eq!(consent.status, ConsentStatus::Granted);
    assert_eq!(consent.requested_at, 5_000);
    assert_eq!(consent.responded_at, Some(6_000));
}

#[test]
fn test_deny_is_terminal() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    let consent_id = request_consent(&contract, &env, &hospital, &patient);
    contract.respond_consent(&patient, &consent_id, &false);

    assert_eq!(
        contract.get_consent(&consent_id).status,
        ConsentStatus::Denied
    );

    // No further transitions on the denied instance
    let result = contract.try_respond_consent(&patient, &consent_id, &true);
    assert_eq!(result, Err(Ok(AccessError::ConsentNotPending)));
    let result = contract.try_revoke_consent(&hospital, &consent_id);
    assert_eq!(result, Err(Ok(AccessError::ConsentNotGranted)));
}

#[test]
fn test_fresh_request_after_denial() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    let first_id = request_consent(&contract, &env, &hospital, &patient);
    contract.respond_consent(&patient, &first_id, &false);

    // Denial frees the pair for a brand-new instance
    let second_id = request_consent(&contract, &env, &hospital, &patient);
    assert_ne!(first_id, second_id);
    assert_eq!(
        contract.get_consent(&second_id).status,
        ConsentStatus::Pending
    );
    assert_eq!(
        contract.get_consent(&first_id).status,
        ConsentStatus::Denied
    );
}

#[test]
fn test_revoke_granted_consent() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000);

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    let consent_id = grant_consent(&contract, &env, &hospital, &patient);

    env.ledger().set_timestamp(2_000);
    contract.revoke_consent(&hospital, &consent_id);

    let consent = contract.get_consent(&consent_id);
    assert_eq!(consent.status, ConsentStatus::Revoked);
    assert_eq!(consent.revoked_at, Some(2_000));

    // Revoked is terminal; re-requesting goes through pending again
    let new_id = request_consent(&contract, &env, &hospital, &patient);
    assert_eq!(contract.get_consent(&new_id).status, ConsentStatus::Pending);
}

#[test]
fn test_revoke_requires_granted_status() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    let consent_id = request_consent(&contract, &env, &hospital, &patient);

    let result = contract.try_revoke_consent(&hospital, &consent_id);
    assert_eq!(result, Err(Ok(AccessError::ConsentNotGranted)));
}

#[test]
fn test_respond_on_foreign_consent_reads_as_missing() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);
    let other_patient = register_patient(&contract, &env);

    let consent_id = request_consent(&contract, &env, &hospital, &patient);

    let result = contract.try_respond_consent(&other_patient, &consent_id, &true);
    assert_eq!(result, Err(Ok(AccessError::ConsentNotFound)));
}

#[test]
fn test_revoke_by_foreign_hospital_reads_as_missing() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let other_hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    let consent_id = grant_consent(&contract, &env, &hospital, &patient);

    let result = contract.try_revoke_consent(&other_hospital, &consent_id);
    assert_eq!(result, Err(Ok(AccessError::ConsentNotFound)));
}

#[test]
fn test_request_for_unregistered_patient() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let stranger = Address::generate(&env);

    let result = contract.try_request_consent(
        &hospital,
        &stranger,
        &String::from_str(&env, "Unknown"),
        &String::from_str(&env, "+910000000000"),
    );
    assert_eq!(result, Err(Ok(AccessError::UserNotFound)));
}

#[test]
fn test_hospital_listings_newest_first() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let first_patient = register_patient(&contract, &env);
    let second_patient = register_patient(&contract, &env);

    let first_id = request_consent(&contract, &env, &hospital, &first_patient);
    let second_id = request_consent(&contract, &env, &hospital, &second_patient);

    let consents = contract.get_hospital_consents(&hospital);
    assert_eq!(consents.len(), 2);
    assert_eq!(consents.get(0).unwrap().id, second_id);
    assert_eq!(consents.get(1).unwrap().id, first_id);
}

#[test]
fn test_granted_listing_filters_status() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let granting_patient = register_patient(&contract, &env);
    let denying_patient = register_patient(&contract, &env);
    let silent_patient = register_patient(&contract, &env);

    let granted_id = grant_consent(&contract, &env, &hospital, &granting_patient);
    let denied_id = request_consent(&contract, &env, &hospital, &denying_patient);
    contract.respond_consent(&denying_patient, &denied_id, &false);
    request_consent(&contract, &env, &hospital, &silent_patient);

    let granted = contract.get_hospital_granted(&hospital);
    assert_eq!(granted.len(), 1);
    assert_eq!(granted.get(0).unwrap().id, granted_id);

    assert_eq!(contract.get_hospital_consents(&hospital).len(), 3);
}

#[test]
fn test_patient_sees_own_requests() {
    let env = Env::default();
    env.mock_all_auths();

    let contract = create_test_contract(&env);
    let hospital = register_hospital(&contract, &env);
    let other_hospital = register_hospital(&contract, &env);
    let patient = register_patient(&contract, &env);

    request_consent(&contract, &env, &hospital, &patient);
    request_consent(&contract, &env, &other_hospital, &patient);

    assert_eq!(contract.get_patient_consents(&patient).len(), 2);
}
