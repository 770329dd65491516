use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::errors::AccessError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NotificationKind {
    ConsentRequested,
    ConsentGranted,
    ConsentDenied,
    ConsentRevoked,
    NewPrescription,
    NewReport,
}

/// Fan-out record consumed by dashboard polling
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub user: Address,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_id: Option<u64>,
    pub is_read: bool,
    pub created_at: u64,
}

// Storage keys
const INBOX: Symbol = symbol_short!("INBOX");
const NEXT_NOTIFICATION_ID: Symbol = symbol_short!("NEXT_NID");

// Oldest entries fall off once a user's inbox reaches this size
const MAX_INBOX: u32 = 100;

/// Append to the recipient's inbox and publish the matching contract event.
/// The event is the fire-and-forget external notifier hook; the stored
/// record is what the dashboard polls.
pub fn push(
    env: &Env,
    user: &Address,
    kind: NotificationKind,
    title: String,
    message: String,
    related_id: Option<u64>,
) {
    let notification_id = get_next_notification_id(env);
    let notification = Notification {
        id: notification_id,
        user: user.clone(),
        kind: kind.clone(),
        title,
        message,
        related_id,
        is_read: false,
        created_at: env.ledger().timestamp(),
    };

    let key = storage_key_inbox(user);
    let mut inbox: Vec<Notification> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));

    // Newest first
    inbox.push_front(notification);
    if inbox.len() > MAX_INBOX {
        inbox.pop_back();
    }
    env.storage().persistent().set(&key, &inbox);

    env.events()
        .publish((symbol_short!("notify"), user.clone()), notification_id);
}

pub fn get_notifications(env: &Env, user: &Address, unread_only: bool) -> Vec<Notification> {
    let inbox: Vec<Notification> = env
        .storage()
        .persistent()
        .get(&storage_key_inbox(user))
        .unwrap_or_else(|| Vec::new(env));

    if !unread_only {
        return inbox;
    }

    let mut unread = Vec::new(env);
    for i in 0..inbox.len() {
        let notification = inbox.get(i).unwrap();
        if !notification.is_read {
            unread.push_back(notification);
        }
    }
    unread
}

pub fn mark_read(env: &Env, user: Address, notification_id: u64) -> Result<(), AccessError> {
    user.require_auth();

    let key = storage_key_inbox(&user);
    let mut inbox: Vec<Notification> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));

    for i in 0..inbox.len() {
        let mut notification = inbox.get(i).unwrap();
        if notification.id == notification_id {
            notification.is_read = true;
            inbox.set(i, notification);
            env.storage().persistent().set(&key, &inbox);
            return Ok(());
        }
    }

    Err(AccessError::NotificationNotFound)
}

fn get_next_notification_id(env: &Env) -> u64 {
    let current_id: u64 = env
        .storage()
        .instance()
        .get(&NEXT_NOTIFICATION_ID)
        .unwrap_or(1);
    env.storage()
        .instance()
        .set(&NEXT_NOTIFICATION_ID, &(current_id + 1));
    current_id
}

fn storage_key_inbox(user: &Address) -> (Symbol, Address) {
    (INBOX, user.clone())
}
