#![no_std]

mod dispatch;
mod errors;
mod reminder;
mod timing;

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol, Vec};

pub use dispatch::ReminderDueEvent;
pub use errors::ReminderError;
pub use reminder::{MedicineInput, Reminder};

// Instance storage keys
const ADMIN: Symbol = symbol_short!("ADMIN");
const RECORDS_CONTRACT: Symbol = symbol_short!("RECORDS");

#[contract]
pub struct MedicineReminderScheduler;

#[contractimpl]
impl MedicineReminderScheduler {
    /// Initialize the contract with an admin address
    pub fn initialize(env: Env, admin: Address) -> Result<(), ReminderError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(ReminderError::AlreadyInitialized);
        }
        env.storage().instance().set(&ADMIN, &admin);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, ReminderError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ReminderError::NotInitialized)
    }

    /// Wire the records contract allowed to synchronise prescriptions
    pub fn set_records_contract(
        env: Env,
        caller: Address,
        records: Address,
    ) -> Result<(), ReminderError> {
        caller.require_auth();
        let admin = Self::get_admin(env.clone())?;
        if caller != admin {
            return Err(ReminderError::Unauthorized);
        }
        env.storage().instance().set(&RECORDS_CONTRACT, &records);
        Ok(())
    }

    /// Replace the reminder set derived from a prescription. Called by the
    /// records contract on prescription creation and on every edit; the old
    /// set is dropped wholesale and regenerated from the new medicine list.
    pub fn sync_prescription(
        env: Env,
        caller: Address,
        patient: Address,
        family_member: Option<u64>,
        prescription_id: u64,
        prescribed_at: u64,
        medicines: Vec<MedicineInput>,
    ) -> Result<u32, ReminderError> {
        caller.require_auth();

        let records: Address = env
            .storage()
            .instance()
            .get(&RECORDS_CONTRACT)
            .ok_or(ReminderError::Unauthorized)?;
        if caller != records {
            return Err(ReminderError::Unauthorized);
        }

        reminder::sync_prescription(
            &env,
            patient,
            family_member,
            prescription_id,
            prescribed_at,
            medicines,
        )
    }

    pub fn get_reminder(env: Env, reminder_id: u64) -> Result<Reminder, ReminderError> {
        reminder::get_reminder(&env, reminder_id)
    }

    pub fn get_reminders(
        env: Env,
        patient: Address,
        family_member: Option<u64>,
    ) -> Vec<Reminder> {
        reminder::get_reminders(&env, &patient, family_member)
    }

    pub fn get_prescription_reminders(env: Env, prescription_id: u64) -> Vec<Reminder> {
        reminder::get_prescription_reminders(&env, prescription_id)
    }

    /// Mark a reminder done; completed is terminal
    pub fn complete_reminder(
        env: Env,
        patient: Address,
        reminder_id: u64,
    ) -> Result<(), ReminderError> {
        reminder::complete_reminder(&env, patient, reminder_id)
    }

    /// Pause or resume a reminder; returns the new active state
    pub fn toggle_reminder(
        env: Env,
        patient: Address,
        reminder_id: u64,
    ) -> Result<bool, ReminderError> {
        reminder::toggle_reminder(&env, patient, reminder_id)
    }

    /// Keeper entry point, fired once per minute. Permissionless: the
    /// daily-dedup guard makes extra calls harmless.
    pub fn tick(env: Env) -> u32 {
        dispatch::tick(&env)
    }
}
