//! Timing inference: turns a medicine's free-text timing instruction into
//! concrete reminder slots (minutes since midnight).
//!
//! The policy is forgiving: unrecognized text falls back to the three-dose
//! default instead of erroring, since prescriptions arrive with whatever the
//! doctor typed.

use soroban_sdk::{Env, String, Vec};

/// Morning, afternoon, night
pub const DEFAULT_SLOTS: [u32; 3] = [540, 840, 1260];

// Instructions longer than this cannot be a clock time or a known word
const PARSE_BUF: usize = 32;

/// Resolve a timing instruction to reminder slots:
///
/// 1. blank → the three-dose default
/// 2. `H:MM` / `HH:MM`, optionally suffixed `am`/`pm` → that exact time
/// 3. a known meal/time-of-day word → its conventional slot
/// 4. anything else → the three-dose default
pub fn parse_timing(env: &Env, timing: &String) -> Vec<u32> {
    let len = timing.len() as usize;
    if len == 0 || len > PARSE_BUF {
        return default_slots(env);
    }

    let mut buf = [0u8; PARSE_BUF];
    timing.copy_into_slice(&mut buf[..len]);

    let mut lower = [0u8; PARSE_BUF];
    let text = trim(&buf[..len]);
    let text_len = text.len();
    for (i, byte) in text.iter().enumerate() {
        lower[i] = byte.to_ascii_lowercase();
    }
    let text = &lower[..text_len];

    if text.is_empty() {
        return default_slots(env);
    }

    if let Some(slot) = parse_clock(text) {
        return single_slot(env, slot);
    }

    if let Some(slot) = vocabulary_slot(text) {
        return single_slot(env, slot);
    }

    default_slots(env)
}

fn default_slots(env: &Env) -> Vec<u32> {
    Vec::from_array(env, DEFAULT_SLOTS)
}

fn single_slot(env: &Env, slot: u32) -> Vec<u32> {
    let mut slots = Vec::new(env);
    slots.push_back(slot);
    slots
}

fn trim(mut text: &[u8]) -> &[u8] {
    while let Some((first, rest)) = text.split_first() {
        if first.is_ascii_whitespace() {
            text = rest;
        } else {
            break;
        }
    }
    while let Some((last, rest)) = text.split_last() {
        if last.is_ascii_whitespace() {
            text = rest;
        } else {
            break;
        }
    }
    text
}

/// Strict `H:MM`/`HH:MM` with optional `am`/`pm`, normalized to 24h minutes.
/// `12:00am` is midnight, `12:00pm` stays noon.
fn parse_clock(text: &[u8]) -> Option<u32> {
    let colon = text.iter().position(|byte| *byte == b':')?;
    if colon == 0 || colon > 2 {
        return None;
    }

    let mut hour: u32 = 0;
    for byte in &text[..colon] {
        if !byte.is_ascii_digit() {
            return None;
        }
        hour = hour * 10 + (byte - b'0') as u32;
    }

    let rest = &text[colon + 1..];
    if rest.len() < 2 {
        return None;
    }
    let (minute_digits, mut suffix) = rest.split_at(2);

    let mut minute: u32 = 0;
    for byte in minute_digits {
        if !byte.is_ascii_digit() {
            return None;
        }
        minute = minute * 10 + (byte - b'0') as u32;
    }

    while let Some((first, tail)) = suffix.split_first() {
        if *first == b' ' {
            suffix = tail;
        } else {
            break;
        }
    }

    match suffix {
        b"" => {}
        b"am" => {
            if hour == 12 {
                hour = 0;
            }
        }
        b"pm" => {
            if hour != 12 {
                hour += 12;
            }
        }
        _ => return None,
    }

    if hour > 23 || minute > 59 {
        return None;
    }

    Some(hour * 60 + minute)
}

fn vocabulary_slot(text: &[u8]) -> Option<u32> {
    match text {
        b"morning" => Some(9 * 60),
        b"afternoon" => Some(14 * 60),
        b"evening" => Some(20 * 60),
        b"night" => Some(21 * 60),
        b"breakfast" => Some(8 * 60),
        b"lunch" => Some(13 * 60),
        b"dinner" => Some(20 * 60),
        _ => None,
    }
}
