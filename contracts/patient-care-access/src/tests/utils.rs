use soroban_sdk::{testutils::Address as _, Address, Env, String};

use crate::{PatientCareAccess, PatientCareAccessClient, Role};

/// Helper function to create and initialize a test contract
pub fn create_test_contract(env: &Env) -> PatientCareAccessClient {
    let client = PatientCareAccessClient::new(env, &env.register(PatientCareAccess, ()));
    client.initialize(&Address::generate(env));
    client
}

/// Create the contract and keep the admin address around for wiring tests
pub fn create_test_contract_with_admin(env: &Env) -> (PatientCareAccessClient, Address) {
    let client = PatientCareAccessClient::new(env, &env.register(PatientCareAccess, ()));
    let admin = Address::generate(env);
    client.initialize(&admin);
    (client, admin)
}

pub fn register_patient(client: &PatientCareAccessClient, env: &Env) -> Address {
    let patient = Address::generate(env);
    client.register_user(
        &patient,
        &Role::Patient,
        &String::from_str(env, "Asha Rao"),
        &String::from_str(env, "+911234567890"),
    );
    patient
}

pub fn register_hospital(client: &PatientCareAccessClient, env: &Env) -> Address {
    let hospital = Address::generate(env);
    client.register_user(
        &hospital,
        &Role::Hospital,
        &String::from_str(env, "City General Hospital"),
        &String::from_str(env, "+911112223334"),
    );
    hospital
}

pub fn register_lab(client: &PatientCareAccessClient, env: &Env) -> Address {
    let lab = Address::generate(env);
    client.register_user(
        &lab,
        &Role::Lab,
        &String::from_str(env, "Metro Diagnostics"),
        &String::from_str(env, "+911998887776"),
    );
    lab
}

/// Request consent with standard snapshot fields
pub fn request_consent(
    client: &PatientCareAccessClient,
    env: &Env,
    hospital: &Address,
    patient: &Address,
) -> u64 {
    client.request_consent(
        hospital,
        patient,
        &String::from_str(env, "Asha Rao"),
        &String::from_str(env, "+911234567890"),
    )
}

/// Request and immediately grant a consent for the pair
pub fn grant_consent(
    client: &PatientCareAccessClient,
    env: &Env,
    hospital: &Address,
    patient: &Address,
) -> u64 {
    let consent_id = request_consent(client, env, hospital, patient);
    client.respond_consent(patient, &consent_id, &true);
    consent_id
}
