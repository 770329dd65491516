#![no_std]

mod access;
mod admission;
mod consent;
mod emergency;
mod errors;
mod notify;
mod users;

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, String, Symbol, Vec};

pub use access::AccessPath;
pub use admission::Admission;
pub use consent::{Consent, ConsentStatus};
pub use emergency::EmergencyPatient;
pub use errors::AccessError;
pub use notify::{Notification, NotificationKind};
pub use users::{FamilyMember, Role, UserProfile};

// Instance storage keys
const ADMIN: Symbol = symbol_short!("ADMIN");
const RECORDS_CONTRACT: Symbol = symbol_short!("RECORDS");

#[contract]
pub struct PatientCareAccess;

#[contractimpl]
impl PatientCareAccess {
    /// Initialize the contract with an admin address
    pub fn initialize(env: Env, admin: Address) -> Result<(), AccessError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(AccessError::AlreadyInitialized);
        }
        env.storage().instance().set(&ADMIN, &admin);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, AccessError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(AccessError::NotInitialized)
    }

    /// Wire the records contract allowed to push record notifications
    pub fn set_records_contract(
        env: Env,
        caller: Address,
        records: Address,
    ) -> Result<(), AccessError> {
        caller.require_auth();
        let admin = Self::get_admin(env.clone())?;
        if caller != admin {
            return Err(AccessError::Unauthorized);
        }
        env.storage().instance().set(&RECORDS_CONTRACT, &records);
        Ok(())
    }

    // User registry
    pub fn register_user(
        env: Env,
        user: Address,
        role: Role,
        name: String,
        phone: String,
    ) -> Result<(), AccessError> {
        users::register_user(&env, user, role, name, phone)
    }

    pub fn get_user(env: Env, user: Address) -> Result<UserProfile, AccessError> {
        users::get_user(&env, &user)
    }

    pub fn add_family_member(
        env: Env,
        patient: Address,
        name: String,
        relation: String,
    ) -> Result<u64, AccessError> {
        users::add_family_member(&env, patient, name, relation)
    }

    pub fn get_family_members(env: Env, patient: Address) -> Vec<FamilyMember> {
        users::get_family_members(&env, &patient)
    }

    pub fn family_member_exists(env: Env, patient: Address, member_id: u64) -> bool {
        users::family_member_exists(&env, &patient, member_id)
    }

    // Consent ledger
    pub fn request_consent(
        env: Env,
        hospital: Address,
        patient: Address,
        patient_name: String,
        patient_phone: String,
    ) -> Result<u64, AccessError> {
        consent::request_consent(&env, hospital, patient, patient_name, patient_phone)
    }

    pub fn respond_consent(
        env: Env,
        patient: Address,
        consent_id: u64,
        grant: bool,
    ) -> Result<(), AccessError> {
        consent::respond_consent(&env, patient, consent_id, grant)
    }

    pub fn revoke_consent(env: Env, hospital: Address, consent_id: u64) -> Result<(), AccessError> {
        consent::revoke_consent(&env, hospital, consent_id)
    }

    pub fn get_consent(env: Env, consent_id: u64) -> Result<Consent, AccessError> {
        consent::get_consent(&env, consent_id)
    }

    pub fn get_hospital_consents(env: Env, hospital: Address) -> Vec<Consent> {
        consent::get_hospital_consents(&env, &hospital)
    }

    pub fn get_hospital_granted(env: Env, hospital: Address) -> Vec<Consent> {
        consent::get_hospital_granted(&env, &hospital)
    }

    pub fn get_patient_consents(env: Env, patient: Address) -> Vec<Consent> {
        consent::get_patient_consents(&env, &patient)
    }

    // Admissions
    pub fn admit_patient(
        env: Env,
        hospital: Address,
        patient: Address,
        patient_name: String,
        notes: String,
    ) -> Result<u64, AccessError> {
        admission::admit_patient(&env, hospital, patient, patient_name, notes)
    }

    pub fn discharge_patient(
        env: Env,
        hospital: Address,
        admission_id: u64,
    ) -> Result<(), AccessError> {
        admission::discharge_patient(&env, hospital, admission_id)
    }

    pub fn get_admission(env: Env, admission_id: u64) -> Result<Admission, AccessError> {
        admission::get_admission(&env, admission_id)
    }

    pub fn get_hospital_admissions(
        env: Env,
        hospital: Address,
        active_only: bool,
    ) -> Vec<Admission> {
        admission::get_hospital_admissions(&env, &hospital, active_only)
    }

    // Emergency admissions (bed-label identities)
    pub fn admit_emergency(
        env: Env,
        hospital: Address,
        bed_label: String,
        notes: String,
    ) -> Result<u64, AccessError> {
        emergency::admit_emergency(&env, hospital, bed_label, notes)
    }

    pub fn discharge_emergency(
        env: Env,
        hospital: Address,
        emergency_id: u64,
    ) -> Result<(), AccessError> {
        emergency::discharge_emergency(&env, hospital, emergency_id)
    }

    pub fn get_emergency_patient(
        env: Env,
        emergency_id: u64,
    ) -> Result<EmergencyPatient, AccessError> {
        emergency::get_emergency_patient(&env, emergency_id)
    }

    pub fn get_hospital_emergencies(
        env: Env,
        hospital: Address,
        active_only: bool,
    ) -> Vec<EmergencyPatient> {
        emergency::get_hospital_emergencies(&env, &hospital, active_only)
    }

    pub fn is_emergency_active(env: Env, hospital: Address, emergency_id: u64) -> bool {
        emergency::is_emergency_active(&env, &hospital, emergency_id)
    }

    // Access resolver
    pub fn check_access(env: Env, hospital: Address, patient: Address) -> AccessPath {
        access::check_access(&env, &hospital, &patient)
    }

    // Notification inbox
    pub fn get_notifications(env: Env, user: Address, unread_only: bool) -> Vec<Notification> {
        notify::get_notifications(&env, &user, unread_only)
    }

    pub fn mark_notification_read(
        env: Env,
        user: Address,
        notification_id: u64,
    ) -> Result<(), AccessError> {
        notify::mark_read(&env, user, notification_id)
    }

    /// Entry point for the linked records contract to fan out new-record
    /// notifications. Any other caller is rejected.
    pub fn push_notification(
        env: Env,
        caller: Address,
        user: Address,
        kind: NotificationKind,
        title: String,
        message: String,
        related_id: Option<u64>,
    ) -> Result<(), AccessError> {
        caller.require_auth();

        let records: Address = env
            .storage()
            .instance()
            .get(&RECORDS_CONTRACT)
            .ok_or(AccessError::Unauthorized)?;
        if caller != records {
            return Err(AccessError::Unauthorized);
        }

        notify::push(&env, &user, kind, title, message, related_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
