use soroban_sdk::{contracttype, symbol_short, Env, String};

use crate::reminder::{self, SECONDS_PER_DAY};

/// Payload published to the notification channel for each due reminder
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReminderDueEvent {
    pub reminder_id: u64,
    pub medicine_name: String,
    pub dosage: String,
    /// Minutes since midnight
    pub slot: u32,
}

/// One dispatch tick, fired once per minute by an external keeper.
///
/// Finds reminders whose slot matches the current ledger minute and which
/// are inside their validity window, and publishes one notification per
/// reminder per calendar day. The `last_sent_day` guard makes repeated
/// ticks within the same minute or day no-ops, so a restarted keeper cannot
/// double-send. There is no catch-up: a minute with no tick skips that
/// day's dose for the slot.
///
/// Returns the number of notifications dispatched.
pub fn tick(env: &Env) -> u32 {
    let now = env.ledger().timestamp();
    let today = now / SECONDS_PER_DAY;
    let slot = ((now % SECONDS_PER_DAY) / 60) as u32;

    let due_ids = reminder::slot_reminder_ids(env, slot);

    let mut sent: u32 = 0;
    for i in 0..due_ids.len() {
        let reminder_id = due_ids.get(i).unwrap();

        // One bad row never blocks the rest of the tick
        let mut due = match reminder::get_reminder(env, reminder_id) {
            Ok(due) => due,
            Err(_) => continue,
        };

        if !due.is_active || due.completed {
            continue;
        }
        if today < due.start_day || today >= due.end_day {
            continue;
        }
        if due.last_sent_day == Some(today) {
            // Already notified today
            continue;
        }

        env.events().publish(
            (symbol_short!("remind"), due.patient.clone()),
            ReminderDueEvent {
                reminder_id,
                medicine_name: due.medicine_name.clone(),
                dosage: due.dosage.clone(),
                slot,
            },
        );

        due.last_sent_day = Some(today);
        reminder::set_reminder(env, &due);

        sent += 1;
    }

    sent
}
