use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RecordsError {
    // System errors
    NotInitialized = 1000,
    AlreadyInitialized = 1001,
    Unauthorized = 1002,

    // Missing entities (or entity not owned by the calling actor)
    PrescriptionNotFound = 2000,
    ReportNotFound = 2001,
    EmergencyPatientNotFound = 2002,
    PatientNotFound = 2003,

    // Access control
    AccessDenied = 5000,

    // Validation errors
    MedicinesRequired = 6000,
    MedicineNameRequired = 6001,
    MedicineDosageRequired = 6002,
    DurationRequired = 6003,
    FamilyMemberInvalid = 6004,
    ReportTypeRequired = 6005,
    ReportNameRequired = 6006,
}
