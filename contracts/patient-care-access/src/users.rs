use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::errors::AccessError;

/// Actor roles in the care network
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Patient,
    Hospital,
    Lab,
}

/// Registered user profile. The address is the identity; phone is kept as a
/// display string only.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserProfile {
    pub address: Address,
    pub role: Role,
    pub name: String,
    pub phone: String,
    /// Identity verification happens in the signup flow before the address
    /// ever reaches this registry
    pub verified: bool,
    pub registered_at: u64,
}

/// Dependent of a patient account, not separately authenticable
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FamilyMember {
    pub id: u64,
    pub patient: Address,
    pub name: String,
    pub relation: String,
}

// Storage keys
const USERS: Symbol = symbol_short!("USERS");
const FAMILY: Symbol = symbol_short!("FAMILY");
const FAMILY_IDX: Symbol = symbol_short!("FAM_IDX");
const NEXT_FAMILY_ID: Symbol = symbol_short!("NEXT_FID");

pub fn register_user(
    env: &Env,
    user: Address,
    role: Role,
    name: String,
    phone: String,
) -> Result<(), AccessError> {
    user.require_auth();

    if name.len() == 0 {
        return Err(AccessError::NameRequired);
    }

    let key = storage_key_user(&user);
    if env.storage().persistent().has(&key) {
        return Err(AccessError::UserAlreadyRegistered);
    }

    let profile = UserProfile {
        address: user,
        role,
        name,
        phone,
        verified: true,
        registered_at: env.ledger().timestamp(),
    };
    env.storage().persistent().set(&key, &profile);

    Ok(())
}

pub fn get_user(env: &Env, user: &Address) -> Result<UserProfile, AccessError> {
    env.storage()
        .persistent()
        .get(&storage_key_user(user))
        .ok_or(AccessError::UserNotFound)
}

/// Fetch a user and check the expected role in one step
pub fn require_role(env: &Env, user: &Address, role: Role) -> Result<UserProfile, AccessError> {
    let profile = get_user(env, user)?;
    if profile.role != role {
        return Err(AccessError::RoleMismatch);
    }
    Ok(profile)
}

pub fn add_family_member(
    env: &Env,
    patient: Address,
    name: String,
    relation: String,
) -> Result<u64, AccessError> {
    patient.require_auth();

    require_role(env, &patient, Role::Patient)?;

    if name.len() == 0 {
        return Err(AccessError::NameRequired);
    }

    let member_id = get_next_family_id(env);
    let member = FamilyMember {
        id: member_id,
        patient: patient.clone(),
        name,
        relation,
    };

    env.storage()
        .persistent()
        .set(&storage_key_family(member_id), &member);

    let mut member_ids = get_family_ids(env, &patient);
    member_ids.push_back(member_id);
    env.storage()
        .persistent()
        .set(&storage_key_family_index(&patient), &member_ids);

    Ok(member_id)
}

pub fn get_family_members(env: &Env, patient: &Address) -> Vec<FamilyMember> {
    let member_ids = get_family_ids(env, patient);

    let mut members = Vec::new(env);
    for i in 0..member_ids.len() {
        let member_id = member_ids.get(i).unwrap();
        if let Some(member) = env
            .storage()
            .persistent()
            .get(&storage_key_family(member_id))
        {
            members.push_back(member);
        }
    }

    members
}

pub fn family_member_exists(env: &Env, patient: &Address, member_id: u64) -> bool {
    let member: Option<FamilyMember> = env.storage().persistent().get(&storage_key_family(member_id));
    match member {
        Some(m) => m.patient == *patient,
        None => false,
    }
}

fn get_family_ids(env: &Env, patient: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&storage_key_family_index(patient))
        .unwrap_or_else(|| Vec::new(env))
}

fn get_next_family_id(env: &Env) -> u64 {
    let current_id: u64 = env.storage().instance().get(&NEXT_FAMILY_ID).unwrap_or(1);
    env.storage()
        .instance()
        .set(&NEXT_FAMILY_ID, &(current_id + 1));
    current_id
}

fn storage_key_user(user: &Address) -> (Symbol, Address) {
    (USERS, user.clone())
}

fn storage_key_family(member_id: u64) -> (Symbol, u64) {
    (FAMILY, member_id)
}

fn storage_key_family_index(patient: &Address) -> (Symbol, Address) {
    (FAMILY_IDX, patient.clone())
}
