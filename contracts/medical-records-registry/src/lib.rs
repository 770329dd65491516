#![no_std]

mod errors;
mod prescription;
mod report;

use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol, Vec,
};

use medicine_reminder_scheduler::MedicineReminderSchedulerClient;
use patient_care_access::{AccessPath, EmergencyPatient, PatientCareAccessClient};

pub use errors::RecordsError;
pub use prescription::{Medicine, Prescription};
pub use report::{MedicalReport, UploaderRole};

/// The one patient association a record carries: either a registered account
/// or an emergency bed identity, never both
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PatientLink {
    Registered(Address),
    Emergency(u64),
}

/// Consent-resolved view handed to a hospital, with the path that granted it
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRecordView {
    pub access: AccessPath,
    pub prescriptions: Vec<Prescription>,
    pub reports: Vec<MedicalReport>,
}

/// Custody view over an emergency identity's records
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyRecordView {
    pub patient: EmergencyPatient,
    pub prescriptions: Vec<Prescription>,
    pub reports: Vec<MedicalReport>,
}

// Instance storage keys
const ADMIN: Symbol = symbol_short!("ADMIN");
const CARE_CONTRACT: Symbol = symbol_short!("CARE");
const REMINDER_CONTRACT: Symbol = symbol_short!("REMIND");

pub(crate) fn care_client(env: &Env) -> Result<PatientCareAccessClient<'static>, RecordsError> {
    let address: Address = env
        .storage()
        .instance()
        .get(&CARE_CONTRACT)
        .ok_or(RecordsError::NotInitialized)?;
    Ok(PatientCareAccessClient::new(env, &address))
}

pub(crate) fn reminders_client(
    env: &Env,
) -> Result<MedicineReminderSchedulerClient<'static>, RecordsError> {
    let address: Address = env
        .storage()
        .instance()
        .get(&REMINDER_CONTRACT)
        .ok_or(RecordsError::NotInitialized)?;
    Ok(MedicineReminderSchedulerClient::new(env, &address))
}

#[contract]
pub struct MedicalRecordsRegistry;

#[contractimpl]
impl MedicalRecordsRegistry {
    /// Initialize with the linked access-control and reminder contracts
    pub fn initialize(
        env: Env,
        admin: Address,
        care_access: Address,
        reminder_scheduler: Address,
    ) -> Result<(), RecordsError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(RecordsError::AlreadyInitialized);
        }
        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&CARE_CONTRACT, &care_access);
        env.storage()
            .instance()
            .set(&REMINDER_CONTRACT, &reminder_scheduler);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, RecordsError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(RecordsError::NotInitialized)
    }

    // Prescriptions
    pub fn add_prescription(
        env: Env,
        hospital: Address,
        patient: PatientLink,
        family_member: Option<u64>,
        doctor_name: String,
        medicines: Vec<Medicine>,
        notes: String,
    ) -> Result<u64, RecordsError> {
        prescription::add_prescription(
            &env,
            hospital,
            patient,
            family_member,
            doctor_name,
            medicines,
            notes,
        )
    }

    pub fn update_prescription(
        env: Env,
        hospital: Address,
        prescription_id: u64,
        medicines: Vec<Medicine>,
        notes: String,
    ) -> Result<(), RecordsError> {
        prescription::update_prescription(&env, hospital, prescription_id, medicines, notes)
    }

    pub fn get_prescription(env: Env, prescription_id: u64) -> Result<Prescription, RecordsError> {
        prescription::get_prescription(&env, prescription_id)
    }

    pub fn get_hospital_prescriptions(env: Env, hospital: Address) -> Vec<Prescription> {
        prescription::get_hospital_prescriptions(&env, &hospital)
    }

    pub fn get_patient_prescriptions(
        env: Env,
        patient: Address,
        family_member: Option<u64>,
    ) -> Vec<Prescription> {
        prescription::get_patient_prescriptions(&env, &patient, family_member)
    }

    // Reports
    #[allow(clippy::too_many_arguments)]
    pub fn add_lab_report(
        env: Env,
        lab: Address,
        patient: Address,
        family_member: Option<u64>,
        hospital_name: String,
        report_type: String,
        report_name: String,
        description: String,
        file_hash: String,
    ) -> Result<u64, RecordsError> {
        report::add_lab_report(
            &env,
            lab,
            patient,
            family_member,
            hospital_name,
            report_type,
            report_name,
            description,
            file_hash,
        )
    }

    pub fn add_emergency_report(
        env: Env,
        hospital: Address,
        emergency_id: u64,
        report_type: String,
        report_name: String,
        description: String,
        file_hash: String,
    ) -> Result<u64, RecordsError> {
        report::add_emergency_report(
            &env,
            hospital,
            emergency_id,
            report_type,
            report_name,
            description,
            file_hash,
        )
    }

    pub fn get_report(env: Env, report_id: u64) -> Result<MedicalReport, RecordsError> {
        report::get_report(&env, report_id)
    }

    pub fn get_patient_reports(
        env: Env,
        patient: Address,
        family_member: Option<u64>,
    ) -> Vec<MedicalReport> {
        report::get_patient_reports(&env, &patient, family_member)
    }

    pub fn get_lab_reports(env: Env, lab: Address) -> Vec<MedicalReport> {
        report::get_lab_reports(&env, &lab)
    }

    /// Consent-gated hospital read over a registered patient's records.
    /// The resolver runs on every call: a discharge or revocation between
    /// two calls closes the view immediately.
    pub fn get_patient_records(
        env: Env,
        hospital: Address,
        patient: Address,
    ) -> Result<PatientRecordView, RecordsError> {
        hospital.require_auth();

        let care = care_client(&env)?;
        let access = care.check_access(&hospital, &patient);
        if access == AccessPath::Denied {
            // Deliberately not distinguishing "no such patient" here
            return Err(RecordsError::AccessDenied);
        }

        Ok(PatientRecordView {
            access,
            prescriptions: prescription::all_patient_prescriptions(&env, &patient),
            reports: report::all_patient_reports(&env, &patient),
        })
    }

    /// Custody view over an emergency identity. Remains readable after
    /// discharge so the record trail survives the stay.
    pub fn get_emergency_records(
        env: Env,
        hospital: Address,
        emergency_id: u64,
    ) -> Result<EmergencyRecordView, RecordsError> {
        hospital.require_auth();

        let care = care_client(&env)?;
        let patient = care
            .try_get_emergency_patient(&emergency_id)
            .map_err(|_| RecordsError::EmergencyPatientNotFound)?
            .map_err(|_| RecordsError::EmergencyPatientNotFound)?;
        if patient.hospital != hospital {
            return Err(RecordsError::EmergencyPatientNotFound);
        }

        Ok(EmergencyRecordView {
            patient,
            prescriptions: prescription::get_emergency_prescriptions(&env, emergency_id),
            reports: report::get_emergency_reports(&env, emergency_id),
        })
    }
}
