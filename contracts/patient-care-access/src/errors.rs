use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AccessError {
    // System errors
    NotInitialized = 1000,
    AlreadyInitialized = 1001,
    Unauthorized = 1002,

    // Missing entities (or entity not owned by the calling actor)
    UserNotFound = 2000,
    ConsentNotFound = 2001,
    AdmissionNotFound = 2002,
    EmergencyPatientNotFound = 2003,
    NotificationNotFound = 2004,

    // State machine preconditions
    ConsentNotPending = 3000,
    ConsentNotGranted = 3001,
    AlreadyDischarged = 3002,

    // Uniqueness conflicts
    UserAlreadyRegistered = 4000,
    ConsentAlreadyOpen = 4001,
    AlreadyAdmitted = 4002,
    BedOccupied = 4003,

    // Access control
    AccessDenied = 5000,

    // Validation errors
    NameRequired = 6000,
    BedLabelRequired = 6001,
    RoleMismatch = 6002,
}
