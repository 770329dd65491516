use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::errors::ReminderError;
use crate::timing;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// One medicine line of a prescription, as handed over by the records
/// contract
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MedicineInput {
    pub name: String,
    pub dosage: String,
    /// Free-text timing instruction; blank or unrecognized text falls back
    /// to the three-dose default
    pub timing: String,
    pub duration_days: u32,
}

/// One reminder per (medicine, slot) pair, valid over `[start_day, end_day)`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reminder {
    pub id: u64,
    pub patient: Address,
    pub family_member: Option<u64>,
    pub prescription_id: u64,
    pub medicine_name: String,
    pub dosage: String,
    /// Minutes since midnight
    pub slot: u32,
    pub start_day: u64,
    /// Exclusive
    pub end_day: u64,
    pub is_active: bool,
    pub completed: bool,
    /// Day index of the most recent dispatch, the daily-dedup guard
    pub last_sent_day: Option<u64>,
}

// Storage keys
const REMINDERS: Symbol = symbol_short!("REMINDS");
const SLOT_INDEX: Symbol = symbol_short!("SLOT_IDX");
const PATIENT_INDEX: Symbol = symbol_short!("PAT_IDX");
const PRESCRIPTION_INDEX: Symbol = symbol_short!("RX_IDX");
const NEXT_REMINDER_ID: Symbol = symbol_short!("NEXT_RID");

/// Replace the reminder set derived from one prescription.
///
/// Always deletes before regenerating: edits swap the whole set, so manual
/// completed/inactive state on stale slots does not survive an edit.
pub fn sync_prescription(
    env: &Env,
    patient: Address,
    family_member: Option<u64>,
    prescription_id: u64,
    prescribed_at: u64,
    medicines: Vec<MedicineInput>,
) -> Result<u32, ReminderError> {
    // Validate the whole batch before touching storage
    for i in 0..medicines.len() {
        if medicines.get(i).unwrap().duration_days == 0 {
            return Err(ReminderError::DurationRequired);
        }
    }

    remove_for_prescription(env, prescription_id);

    let start_day = prescribed_at / SECONDS_PER_DAY;
    let mut created: u32 = 0;

    for i in 0..medicines.len() {
        let medicine = medicines.get(i).unwrap();
        let slots = timing::parse_timing(env, &medicine.timing);

        for j in 0..slots.len() {
            let slot = slots.get(j).unwrap();
            let reminder_id = get_next_reminder_id(env);
            let reminder = Reminder {
                id: reminder_id,
                patient: patient.clone(),
                family_member,
                prescription_id,
                medicine_name: medicine.name.clone(),
                dosage: medicine.dosage.clone(),
                slot,
                start_day,
                end_day: start_day + medicine.duration_days as u64,
                is_active: true,
                completed: false,
                last_sent_day: None,
            };

            env.storage()
                .persistent()
                .set(&storage_key_reminder(reminder_id), &reminder);
            add_to_index(env, &storage_key_slot_index(slot), reminder_id);
            add_to_index(env, &storage_key_patient_index(&patient), reminder_id);
            add_to_index(
                env,
                &storage_key_prescription_index(prescription_id),
                reminder_id,
            );

            created += 1;
        }
    }

    Ok(created)
}

/// Delete every reminder keyed by the prescription, unhooking all indexes
pub fn remove_for_prescription(env: &Env, prescription_id: u64) {
    let key = storage_key_prescription_index(prescription_id);
    let reminder_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));

    for i in 0..reminder_ids.len() {
        let reminder_id = reminder_ids.get(i).unwrap();
        let reminder: Option<Reminder> = env
            .storage()
            .persistent()
            .get(&storage_key_reminder(reminder_id));

        if let Some(reminder) = reminder {
            remove_from_index(env, &storage_key_slot_index(reminder.slot), reminder_id);
            remove_from_index(
                env,
                &storage_key_patient_index(&reminder.patient),
                reminder_id,
            );
            env.storage()
                .persistent()
                .remove(&storage_key_reminder(reminder_id));
        }
    }

    env.storage().persistent().remove(&key);
}

pub fn get_reminder(env: &Env, reminder_id: u64) -> Result<Reminder, ReminderError> {
    env.storage()
        .persistent()
        .get(&storage_key_reminder(reminder_id))
        .ok_or(ReminderError::ReminderNotFound)
}

/// A patient's reminders; `family_member: None` returns only the patient's
/// own, mirroring the dashboard query
pub fn get_reminders(env: &Env, patient: &Address, family_member: Option<u64>) -> Vec<Reminder> {
    let reminder_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&storage_key_patient_index(patient))
        .unwrap_or_else(|| Vec::new(env));

    let mut reminders = Vec::new(env);
    for i in 0..reminder_ids.len() {
        let reminder_id = reminder_ids.get(i).unwrap();
        if let Ok(reminder) = get_reminder(env, reminder_id) {
            if reminder.family_member == family_member {
                reminders.push_back(reminder);
            }
        }
    }

    reminders
}

pub fn get_prescription_reminders(env: &Env, prescription_id: u64) -> Vec<Reminder> {
    let reminder_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&storage_key_prescription_index(prescription_id))
        .unwrap_or_else(|| Vec::new(env));

    let mut reminders = Vec::new(env);
    for i in 0..reminder_ids.len() {
        let reminder_id = reminder_ids.get(i).unwrap();
        if let Ok(reminder) = get_reminder(env, reminder_id) {
            reminders.push_back(reminder);
        }
    }

    reminders
}

/// Mark a dose schedule done. Terminal: completed reminders never reactivate
pub fn complete_reminder(
    env: &Env,
    patient: Address,
    reminder_id: u64,
) -> Result<(), ReminderError> {
    patient.require_auth();

    let mut reminder = owned_reminder(env, &patient, reminder_id)?;

    if reminder.completed {
        return Err(ReminderError::AlreadyCompleted);
    }

    reminder.completed = true;
    reminder.is_active = false;

    env.storage()
        .persistent()
        .set(&storage_key_reminder(reminder_id), &reminder);

    Ok(())
}

/// Pause or resume a reminder; returns the new active state
pub fn toggle_reminder(
    env: &Env,
    patient: Address,
    reminder_id: u64,
) -> Result<bool, ReminderError> {
    patient.require_auth();

    let mut reminder = owned_reminder(env, &patient, reminder_id)?;

    if reminder.completed {
        return Err(ReminderError::AlreadyCompleted);
    }

    reminder.is_active = !reminder.is_active;

    env.storage()
        .persistent()
        .set(&storage_key_reminder(reminder_id), &reminder);

    Ok(reminder.is_active)
}

/// Reminder ids registered for a slot, in creation order
pub fn slot_reminder_ids(env: &Env, slot: u32) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&storage_key_slot_index(slot))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_reminder(env: &Env, reminder: &Reminder) {
    env.storage()
        .persistent()
        .set(&storage_key_reminder(reminder.id), reminder);
}

fn owned_reminder(
    env: &Env,
    patient: &Address,
    reminder_id: u64,
) -> Result<Reminder, ReminderError> {
    let reminder = get_reminder(env, reminder_id)?;
    // A foreign reminder id reads as missing
    if reminder.patient != *patient {
        return Err(ReminderError::ReminderNotFound);
    }
    Ok(reminder)
}

fn add_to_index<K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(
    env: &Env,
    index_key: &K,
    reminder_id: u64,
) {
    let mut reminder_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(index_key)
        .unwrap_or_else(|| Vec::new(env));
    reminder_ids.push_back(reminder_id);
    env.storage().persistent().set(index_key, &reminder_ids);
}

fn remove_from_index<K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(
    env: &Env,
    index_key: &K,
    reminder_id: u64,
) {
    let mut reminder_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(index_key)
        .unwrap_or_else(|| Vec::new(env));

    if let Some(position) = reminder_ids.first_index_of(reminder_id) {
        reminder_ids.remove(position);
        env.storage().persistent().set(index_key, &reminder_ids);
    }
}

fn get_next_reminder_id(env: &Env) -> u64 {
    let current_id: u64 = env
        .storage()
        .instance()
        .get(&NEXT_REMINDER_ID)
        .unwrap_or(1);
    env.storage()
        .instance()
        .set(&NEXT_REMINDER_ID, &(current_id + 1));
    current_id
}

fn storage_key_reminder(reminder_id: u64) -> (Symbol, u64) {
    (REMINDERS, reminder_id)
}

fn storage_key_slot_index(slot: u32) -> (Symbol, u32) {
    (SLOT_INDEX, slot)
}

fn storage_key_patient_index(patient: &Address) -> (Symbol, Address) {
    (PATIENT_INDEX, patient.clone())
}

fn storage_key_prescription_index(prescription_id: u64) -> (Symbol, u64) {
    (PRESCRIPTION_INDEX, prescription_id)
}
