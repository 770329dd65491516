use soroban_sdk::{
    contracttype, symbol_short, xdr::ToXdr, Address, Bytes, BytesN, Env, String, Symbol, Vec,
};

use crate::errors::AccessError;
use crate::users::{self, Role};

/// A patient admitted with no identifying data beyond a bed label. The
/// derived `temporary_id` stands in for a phone number in downstream records
/// and carries no PII.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyPatient {
    pub id: u64,
    pub temporary_id: String,
    pub bed_label: String,
    pub hospital: Address,
    pub admitted_at: u64,
    pub discharged_at: Option<u64>,
    pub is_active: bool,
    pub notes: String,
}

// Storage keys
const EMERGENCIES: Symbol = symbol_short!("EMERGS");
// Occupied-bed slot per (hospital, bed label). Bed occupancy is the
// uniqueness constraint; the generated token is display-only.
const OCCUPIED_BED: Symbol = symbol_short!("BED_OPEN");
const HOSPITAL_EMERGENCIES: Symbol = symbol_short!("EMG_HOSP");
const NEXT_EMERGENCY_ID: Symbol = symbol_short!("NEXT_EID");

pub fn admit_emergency(
    env: &Env,
    hospital: Address,
    bed_label: String,
    notes: String,
) -> Result<u64, AccessError> {
    hospital.require_auth();

    users::require_role(env, &hospital, Role::Hospital)?;

    if bed_label.len() == 0 {
        return Err(AccessError::BedLabelRequired);
    }

    let slot = storage_key_bed(&hospital, &bed_label);
    if env.storage().persistent().has(&slot) {
        return Err(AccessError::BedOccupied);
    }

    let emergency_id = get_next_emergency_id(env);
    let emergency = EmergencyPatient {
        id: emergency_id,
        temporary_id: derive_temporary_id(env, &hospital, &bed_label, emergency_id),
        bed_label,
        hospital: hospital.clone(),
        admitted_at: env.ledger().timestamp(),
        discharged_at: None,
        is_active: true,
        notes,
    };

    env.storage()
        .persistent()
        .set(&storage_key_emergency(emergency_id), &emergency);
    env.storage().persistent().set(&slot, &emergency_id);

    let mut emergency_ids = get_hospital_index(env, &hospital);
    emergency_ids.push_front(emergency_id);
    env.storage()
        .persistent()
        .set(&storage_key_hospital_index(&hospital), &emergency_ids);

    Ok(emergency_id)
}

pub fn discharge_emergency(
    env: &Env,
    hospital: Address,
    emergency_id: u64,
) -> Result<(), AccessError> {
    hospital.require_auth();

    let mut emergency = get_emergency_patient(env, emergency_id)?;

    if emergency.hospital != hospital {
        return Err(AccessError::EmergencyPatientNotFound);
    }

    if !emergency.is_active {
        return Err(AccessError::AlreadyDischarged);
    }

    emergency.is_active = false;
    emergency.discharged_at = Some(env.ledger().timestamp());

    env.storage()
        .persistent()
        .set(&storage_key_emergency(emergency_id), &emergency);
    // Free the bed; the next admission on this label mints a new identity
    env.storage()
        .persistent()
        .remove(&storage_key_bed(&hospital, &emergency.bed_label));

    Ok(())
}

pub fn get_emergency_patient(
    env: &Env,
    emergency_id: u64,
) -> Result<EmergencyPatient, AccessError> {
    env.storage()
        .persistent()
        .get(&storage_key_emergency(emergency_id))
        .ok_or(AccessError::EmergencyPatientNotFound)
}

/// Emergency admissions for a hospital, newest first
pub fn get_hospital_emergencies(
    env: &Env,
    hospital: &Address,
    active_only: bool,
) -> Vec<EmergencyPatient> {
    let emergency_ids = get_hospital_index(env, hospital);

    let mut emergencies = Vec::new(env);
    for i in 0..emergency_ids.len() {
        let emergency_id = emergency_ids.get(i).unwrap();
        if let Ok(emergency) = get_emergency_patient(env, emergency_id) {
            if !active_only || emergency.is_active {
                emergencies.push_back(emergency);
            }
        }
    }

    emergencies
}

/// True when the emergency patient exists, belongs to the hospital and has
/// not been discharged. Queried by the records contract before it links a
/// prescription or report.
pub fn is_emergency_active(env: &Env, hospital: &Address, emergency_id: u64) -> bool {
    match get_emergency_patient(env, emergency_id) {
        Ok(emergency) => emergency.hospital == *hospital && emergency.is_active,
        Err(_) => false,
    }
}

/// Token of the form `EMG-xxxxxxxx`: sha-256 over hospital, bed label, the
/// admission instant and the allocation counter, truncated and hex encoded.
/// Stable for the lifetime of the admission and visually distinct from a
/// phone number.
fn derive_temporary_id(
    env: &Env,
    hospital: &Address,
    bed_label: &String,
    emergency_id: u64,
) -> String {
    let mut seed = Bytes::new(env);
    seed.append(&hospital.clone().to_xdr(env));
    seed.append(&bed_label.clone().to_xdr(env));
    seed.append(&Bytes::from_array(
        env,
        &env.ledger().timestamp().to_be_bytes(),
    ));
    seed.append(&Bytes::from_array(env, &emergency_id.to_be_bytes()));

    let digest: BytesN<32> = env.crypto().sha256(&seed).into();
    let digest = digest.to_array();

    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut token = [0u8; 12];
    token[..4].copy_from_slice(b"EMG-");
    for i in 0..4 {
        token[4 + i * 2] = HEX[(digest[i] >> 4) as usize];
        token[5 + i * 2] = HEX[(digest[i] & 0x0f) as usize];
    }

    String::from_bytes(env, &token)
}

fn get_hospital_index(env: &Env, hospital: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&storage_key_hospital_index(hospital))
        .unwrap_or_else(|| Vec::new(env))
}

fn get_next_emergency_id(env: &Env) -> u64 {
    let current_id: u64 = env
        .storage()
        .instance()
        .get(&NEXT_EMERGENCY_ID)
        .unwrap_or(1);
    env.storage()
        .instance()
        .set(&NEXT_EMERGENCY_ID, &(current_id + 1));
    current_id
}

fn storage_key_emergency(emergency_id: u64) -> (Symbol, u64) {
    (EMERGENCIES, emergency_id)
}

fn storage_key_bed(hospital: &Address, bed_label: &String) -> (Symbol, Address, String) {
    (OCCUPIED_BED, hospital.clone(), bed_label.clone())
}

fn storage_key_hospital_index(hospital: &Address) -> (Symbol, Address) {
    (HOSPITAL_EMERGENCIES, hospital.clone())
}
