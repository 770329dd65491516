use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ReminderError {
    // System errors
    NotInitialized = 1000,
    AlreadyInitialized = 1001,
    Unauthorized = 1002,

    // Missing entities (or entity not owned by the calling actor)
    ReminderNotFound = 2000,

    // State machine preconditions
    AlreadyCompleted = 3000,

    // Validation errors
    DurationRequired = 6000,
}
