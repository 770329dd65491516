use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use patient_care_access::NotificationKind;

use crate::errors::RecordsError;
use crate::{care_client, PatientLink};

/// Who produced the report. Hospitals may only file reports for emergency
/// identities in their custody; reports for registered patients come from
/// diagnostic labs alone. That policy split lives in the entry points below,
/// not in the access resolver.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UploaderRole {
    Hospital,
    Lab,
}

/// Immutable after creation: there is no update or delete entry point
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MedicalReport {
    pub id: u64,
    pub patient: PatientLink,
    pub family_member: Option<u64>,
    pub uploader: UploaderRole,
    pub uploader_id: Address,
    pub uploader_name: String,
    /// Hospital the report was produced for, as claimed by the uploader
    pub hospital_name: String,
    pub report_type: String,
    pub report_name: String,
    pub description: String,
    /// Reference to the stored file, kept off-chain
    pub file_hash: String,
    pub date: u64,
}

// Storage keys
const REPORTS: Symbol = symbol_short!("REPORTS");
const PATIENT_INDEX: Symbol = symbol_short!("REP_PAT");
const EMERGENCY_INDEX: Symbol = symbol_short!("REP_EMG");
const LAB_INDEX: Symbol = symbol_short!("REP_LAB");
const NEXT_REPORT_ID: Symbol = symbol_short!("NEXT_REP");

/// Lab upload path: diagnostic results for a registered patient
#[allow(clippy::too_many_arguments)]
pub fn add_lab_report(
    env: &Env,
    lab: Address,
    patient: Address,
    family_member: Option<u64>,
    hospital_name: String,
    report_type: String,
    report_name: String,
    description: String,
    file_hash: String,
) -> Result<u64, RecordsError> {
    lab.require_auth();

    let care = care_client(env)?;
    let lab_profile = care
        .try_get_user(&lab)
        .map_err(|_| RecordsError::Unauthorized)?
        .map_err(|_| RecordsError::Unauthorized)?;
    if lab_profile.role != patient_care_access::Role::Lab {
        return Err(RecordsError::Unauthorized);
    }

    let patient_profile = care
        .try_get_user(&patient)
        .map_err(|_| RecordsError::PatientNotFound)?
        .map_err(|_| RecordsError::PatientNotFound)?;
    if patient_profile.role != patient_care_access::Role::Patient {
        return Err(RecordsError::PatientNotFound);
    }

    if let Some(member_id) = family_member {
        if !care.family_member_exists(&patient, &member_id) {
            return Err(RecordsError::FamilyMemberInvalid);
        }
    }

    validate_report_fields(&report_type, &report_name)?;

    let report_id = get_next_report_id(env);
    let report = MedicalReport {
        id: report_id,
        patient: PatientLink::Registered(patient.clone()),
        family_member,
        uploader: UploaderRole::Lab,
        uploader_id: lab.clone(),
        uploader_name: lab_profile.name,
        hospital_name,
        report_type,
        report_name,
        description,
        file_hash,
        date: env.ledger().timestamp(),
    };

    env.storage()
        .persistent()
        .set(&storage_key_report(report_id), &report);
    add_to_index(env, &storage_key_patient_index(&patient), report_id);
    add_to_index(env, &storage_key_lab_index(&lab), report_id);

    // Fire-and-forget: a notification failure never aborts the write
    let _ = care.try_push_notification(
        &env.current_contract_address(),
        &patient,
        &NotificationKind::NewReport,
        &String::from_str(env, "New Report"),
        &String::from_str(env, "A new report has been added to your records"),
        &Some(report_id),
    );

    Ok(report_id)
}

/// Hospital upload path, restricted to emergency identities in custody
pub fn add_emergency_report(
    env: &Env,
    hospital: Address,
    emergency_id: u64,
    report_type: String,
    report_name: String,
    description: String,
    file_hash: String,
) -> Result<u64, RecordsError> {
    hospital.require_auth();

    let care = care_client(env)?;
    let hospital_profile = care
        .try_get_user(&hospital)
        .map_err(|_| RecordsError::Unauthorized)?
        .map_err(|_| RecordsError::Unauthorized)?;
    if hospital_profile.role != patient_care_access::Role::Hospital {
        return Err(RecordsError::Unauthorized);
    }

    // Upload requires the patient to still be admitted
    if !care.is_emergency_active(&hospital, &emergency_id) {
        return Err(RecordsError::EmergencyPatientNotFound);
    }

    validate_report_fields(&report_type, &report_name)?;

    let report_id = get_next_report_id(env);
    let report = MedicalReport {
        id: report_id,
        patient: PatientLink::Emergency(emergency_id),
        family_member: None,
        uploader: UploaderRole::Hospital,
        uploader_id: hospital.clone(),
        uploader_name: hospital_profile.name.clone(),
        hospital_name: hospital_profile.name,
        report_type,
        report_name,
        description,
        file_hash,
        date: env.ledger().timestamp(),
    };

    env.storage()
        .persistent()
        .set(&storage_key_report(report_id), &report);
    add_to_index(env, &storage_key_emergency_index(emergency_id), report_id);

    Ok(report_id)
}

pub fn get_report(env: &Env, report_id: u64) -> Result<MedicalReport, RecordsError> {
    env.storage()
        .persistent()
        .get(&storage_key_report(report_id))
        .ok_or(RecordsError::ReportNotFound)
}

/// A patient's own reports; `family_member: None` excludes dependents
pub fn get_patient_reports(
    env: &Env,
    patient: &Address,
    family_member: Option<u64>,
) -> Vec<MedicalReport> {
    let all = collect(env, &storage_key_patient_index(patient));

    let mut filtered = Vec::new(env);
    for i in 0..all.len() {
        let report = all.get(i).unwrap();
        if report.family_member == family_member {
            filtered.push_back(report);
        }
    }
    filtered
}

/// Every report linked to a registered patient, dependents included.
/// Only for access-resolved hospital views.
pub fn all_patient_reports(env: &Env, patient: &Address) -> Vec<MedicalReport> {
    collect(env, &storage_key_patient_index(patient))
}

pub fn get_emergency_reports(env: &Env, emergency_id: u64) -> Vec<MedicalReport> {
    collect(env, &storage_key_emergency_index(emergency_id))
}

/// Reports uploaded by a lab, newest first
pub fn get_lab_reports(env: &Env, lab: &Address) -> Vec<MedicalReport> {
    collect(env, &storage_key_lab_index(lab))
}

fn validate_report_fields(report_type: &String, report_name: &String) -> Result<(), RecordsError> {
    if report_type.len() == 0 {
        return Err(RecordsError::ReportTypeRequired);
    }
    if report_name.len() == 0 {
        return Err(RecordsError::ReportNameRequired);
    }
    Ok(())
}

fn collect<K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(
    env: &Env,
    index_key: &K,
) -> Vec<MedicalReport> {
    let report_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(index_key)
        .unwrap_or_else(|| Vec::new(env));

    let mut reports = Vec::new(env);
    for i in 0..report_ids.len() {
        let report_id = report_ids.get(i).unwrap();
        if let Ok(report) = get_report(env, report_id) {
            reports.push_back(report);
        }
    }
    reports
}

fn add_to_index<K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(
    env: &Env,
    index_key: &K,
    report_id: u64,
) {
    let mut report_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(index_key)
        .unwrap_or_else(|| Vec::new(env));
    // Newest first
    report_ids.push_front(report_id);
    env.storage().persistent().set(index_key, &report_ids);
}

fn get_next_report_id(env: &Env) -> u64 {
    let current_id: u64 = env.storage().instance().get(&NEXT_REPORT_ID).unwrap_or(1);
    env.storage()
        .instance()
        .set(&NEXT_REPORT_ID, &(current_id + 1));
    current_id
}

fn storage_key_report(report_id: u64) -> (Symbol, u64) {
    (REPORTS, report_id)
}

fn storage_key_patient_index(patient: &Address) -> (Symbol, Address) {
    (PATIENT_INDEX, patient.clone())
}

fn storage_key_emergency_index(emergency_id: u64) -> (Symbol, u64) {
    (EMERGENCY_INDEX, emergency_id)
}

fn storage_key_lab_index(lab: &Address) -> (Symbol, Address) {
    (LAB_INDEX, lab.clone())
}
