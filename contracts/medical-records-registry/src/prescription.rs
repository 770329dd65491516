use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use medicine_reminder_scheduler::MedicineInput;
use patient_care_access::NotificationKind;

use crate::errors::RecordsError;
use crate::{care_client, reminders_client, PatientLink};

/// One medicine line of a prescription
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Medicine {
    pub name: String,
    pub dosage: String,
    /// Free-text timing instruction; the reminder scheduler infers slots
    pub timing: String,
    pub duration_days: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prescription {
    pub id: u64,
    pub hospital: Address,
    pub doctor_name: String,
    pub patient: PatientLink,
    pub family_member: Option<u64>,
    pub medicines: Vec<Medicine>,
    pub date: u64,
    pub notes: String,
}

// Storage keys
const PRESCRIPTIONS: Symbol = symbol_short!("RX");
const HOSPITAL_INDEX: Symbol = symbol_short!("RX_HOSP");
const PATIENT_INDEX: Symbol = symbol_short!("RX_PAT");
const EMERGENCY_INDEX: Symbol = symbol_short!("RX_EMG");
const NEXT_PRESCRIPTION_ID: Symbol = symbol_short!("NEXT_RX");

pub fn add_prescription(
    env: &Env,
    hospital: Address,
    patient: PatientLink,
    family_member: Option<u64>,
    doctor_name: String,
    medicines: Vec<Medicine>,
    notes: String,
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

    validate_medicines(&medicines)?;
    validate_patient_link(env, &hospital, &patient, family_member)?;

    let prescription_id = get_next_prescription_id(env);
    let prescription = Prescription {
        id: prescription_id,
        hospital: hospital.clone(),
        doctor_name,
        patient: patient.clone(),
        family_member,
        medicines: medicines.clone(),
        date: env.ledger().timestamp(),
        notes,
    };

    env.storage()
        .persistent()
        .set(&storage_key_prescription(prescription_id), &prescription);

    add_to_index(env, &storage_key_hospital_index(&hospital), prescription_id);
    match &patient {
        PatientLink::Registered(address) => {
            add_to_index(env, &storage_key_patient_index(address), prescription_id);

            // Registered patients get reminders and a dashboard notification;
            // emergency identities have nobody to deliver either to
            sync_reminders(env, address, family_member, &prescription)?;
            // Fire-and-forget: a notification failure never aborts the write
            let _ = care.try_push_notification(
                &env.current_contract_address(),
                address,
                &NotificationKind::NewPrescription,
                &String::from_str(env, "New Prescription"),
                &String::from_str(env, "A new prescription has been added to your records"),
                &Some(prescription_id),
            );
        }
        PatientLink::Emergency(emergency_id) => {
            add_to_index(
                env,
                &storage_key_emergency_index(*emergency_id),
                prescription_id,
            );
        }
    }

    Ok(prescription_id)
}

/// Replace the medicine list and notes. Reminders derived from the old list
/// are dropped wholesale and regenerated; a patient's completed or paused
/// state on stale slots does not carry over.
pub fn update_prescription(
    env: &Env,
    hospital: Address,
    prescription_id: u64,
    medicines: Vec<Medicine>,
    notes: String,
) -> Result<(), RecordsError> {
    hospital.require_auth();

    let mut prescription = get_prescription(env, prescription_id)?;

    if prescription.hospital != hospital {
        return Err(RecordsError::PrescriptionNotFound);
    }

    validate_medicines(&medicines)?;

    prescription.medicines = medicines;
    prescription.notes = notes;

    env.storage()
        .persistent()
        .set(&storage_key_prescription(prescription_id), &prescription);

    if let PatientLink::Registered(address) = &prescription.patient {
        sync_reminders(env, address, prescription.family_member, &prescription)?;
    }

    Ok(())
}

pub fn get_prescription(env: &Env, prescription_id: u64) -> Result<Prescription, RecordsError> {
    env.storage()
        .persistent()
        .get(&storage_key_prescription(prescription_id))
        .ok_or(RecordsError::PrescriptionNotFound)
}

/// Prescriptions written by a hospital, newest first
pub fn get_hospital_prescriptions(env: &Env, hospital: &Address) -> Vec<Prescription> {
    collect(env, &storage_key_hospital_index(hospital))
}

/// A patient's own prescriptions; `family_member: None` excludes dependents
pub fn get_patient_prescriptions(
    env: &Env,
    patient: &Address,
    family_member: Option<u64>,
) -> Vec<Prescription> {
    let all = collect(env, &storage_key_patient_index(patient));

    let mut filtered = Vec::new(env);
    for i in 0..all.len() {
        let prescription = all.get(i).unwrap();
        if prescription.family_member == family_member {
            filtered.push_back(prescription);
        }
    }
    filtered
}

/// Every prescription linked to a registered patient, dependents included.
/// Only for access-resolved hospital views.
pub fn all_patient_prescriptions(env: &Env, patient: &Address) -> Vec<Prescription> {
    collect(env, &storage_key_patient_index(patient))
}

pub fn get_emergency_prescriptions(env: &Env, emergency_id: u64) -> Vec<Prescription> {
    collect(env, &storage_key_emergency_index(emergency_id))
}

fn sync_reminders(
    env: &Env,
    patient: &Address,
    family_member: Option<u64>,
    prescription: &Prescription,
) -> Result<(), RecordsError> {
    let mut inputs = Vec::new(env);
    for i in 0..prescription.medicines.len() {
        let medicine = prescription.medicines.get(i).unwrap();
        inputs.push_back(MedicineInput {
            name: medicine.name,
            dosage: medicine.dosage,
            timing: medicine.timing,
            duration_days: medicine.duration_days,
        });
    }

    let scheduler = reminders_client(env)?;
    scheduler.sync_prescription(
        &env.current_contract_address(),
        patient,
        &family_member,
        &prescription.id,
        &prescription.date,
        &inputs,
    );

    Ok(())
}

fn validate_medicines(medicines: &Vec<Medicine>) -> Result<(), RecordsError> {
    if medicines.len() == 0 {
        return Err(RecordsError::MedicinesRequired);
    }

    for i in 0..medicines.len() {
        let medicine = medicines.get(i).unwrap();
        if medicine.name.len() == 0 {
            return Err(RecordsError::MedicineNameRequired);
        }
        if medicine.dosage.len() == 0 {
            return Err(RecordsError::MedicineDosageRequired);
        }
        if medicine.duration_days == 0 {
            return Err(RecordsError::DurationRequired);
        }
    }

    Ok(())
}

/// Exactly one patient association is possible by construction; what is
/// checked here is that the association resolves to something this hospital
/// may write against.
fn validate_patient_link(
    env: &Env,
    hospital: &Address,
    patient: &PatientLink,
    family_member: Option<u64>,
) -> Result<(), RecordsError> {
    let care = care_client(env)?;

    match patient {
        PatientLink::Registered(address) => {
            let profile = care
                .try_get_user(address)
                .map_err(|_| RecordsError::PatientNotFound)?
                .map_err(|_| RecordsError::PatientNotFound)?;
            if profile.role != patient_care_access::Role::Patient {
                return Err(RecordsError::PatientNotFound);
            }
            if let Some(member_id) = family_member {
                if !care.family_member_exists(address, &member_id) {
                    return Err(RecordsError::FamilyMemberInvalid);
                }
            }
        }
        PatientLink::Emergency(emergency_id) => {
            if family_member.is_some() {
                return Err(RecordsError::FamilyMemberInvalid);
            }
            if !care.is_emergency_active(hospital, emergency_id) {
                return Err(RecordsError::EmergencyPatientNotFound);
            }
        }
    }

    Ok(())
}

fn collect<K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(
    env: &Env,
    index_key: &K,
) -> Vec<Prescription> {
    let prescription_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(index_key)
        .unwrap_or_else(|| Vec::new(env));

    let mut prescriptions = Vec::new(env);
    for i in 0..prescription_ids.len() {
        let prescription_id = prescription_ids.get(i).unwrap();
        if let Ok(prescription) = get_prescription(env, prescription_id) {
            prescriptions.push_back(prescription);
        }
    }
    prescriptions
}

fn add_to_index<K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(
    env: &Env,
    index_key: &K,
    prescription_id: u64,
) {
    let mut prescription_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(index_key)
        .unwrap_or_else(|| Vec::new(env));
    // Newest first
    prescription_ids.push_front(prescription_id);
    env.storage().persistent().set(index_key, &prescription_ids);
}

fn get_next_prescription_id(env: &Env) -> u64 {
    let current_id: u64 = env
        .storage()
        .instance()
        .get(&NEXT_PRESCRIPTION_ID)
        .unwrap_or(1);
    env.storage()
        .instance()
        .set(&NEXT_PRESCRIPTION_ID, &(current_id + 1));
    current_id
}

fn storage_key_prescription(prescription_id: u64) -> (Symbol, u64) {
    (PRESCRIPTIONS, prescription_id)
}

fn storage_key_hospital_index(hospital: &Address) -> (Symbol, Address) {
    (HOSPITAL_INDEX, hospital.clone())
}

fn storage_key_patient_index(patient: &Address) -> (Symbol, Address) {
    (PATIENT_INDEX, patient.clone())
}

fn storage_key_emergency_index(emergency_id: u64) -> (Symbol, u64) {
    (EMERGENCY_INDEX, emergency_id)
}
