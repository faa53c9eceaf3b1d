// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Valid form inputs and records for tests.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, ApplicationStatus, ContactMessage, ListingStatus,
    NewApplication, NewContactMessage, NewFoundReport, NewLostReport, PetFields,
};

/// A fixed timestamp `minutes` after 2026-03-01 09:00 UTC.
pub fn at_minute(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .map(|base| base + chrono::Duration::minutes(minutes))
        .unwrap_or_else(Utc::now)
}

pub fn lost_report(pet_name: &str) -> NewLostReport {
    NewLostReport {
        pet_name: pet_name.to_string(),
        pet_type: "Dog".to_string(),
        breed: "Labrador".to_string(),
        color: "Black".to_string(),
        description: "Red collar".to_string(),
        last_seen_location: "Riverside Park".to_string(),
        last_seen_date: "2026-03-01".to_string(),
        contact_name: "Jordan".to_string(),
        contact_phone: "555-0142".to_string(),
        contact_email: "jordan@example.com".to_string(),
        image_url: String::new(),
    }
}

pub fn found_report(pet_type: &str) -> NewFoundReport {
    NewFoundReport {
        pet_type: pet_type.to_string(),
        breed: "Tabby".to_string(),
        color: "Orange".to_string(),
        description: String::new(),
        found_location: "Maple Avenue".to_string(),
        found_date: "2026-03-02".to_string(),
        contact_name: "Casey".to_string(),
        contact_phone: String::new(),
        contact_email: String::new(),
        image_url: String::new(),
    }
}

pub fn pet_fields(pet_name: &str) -> PetFields {
    PetFields {
        pet_name: pet_name.to_string(),
        pet_type: "Cat".to_string(),
        breed: "Siamese".to_string(),
        age: "2 years".to_string(),
        color: "Cream".to_string(),
        description: "Loves naps".to_string(),
        location: "Central Shelter".to_string(),
        image_url: String::new(),
    }
}

pub fn application() -> NewApplication {
    NewApplication {
        applicant_name: "Morgan".to_string(),
        applicant_email: "morgan@example.com".to_string(),
        applicant_phone: "555-0199".to_string(),
        reason: "Looking for a companion".to_string(),
        living_situation: "Apartment, pets allowed".to_string(),
        experience: "Had cats for ten years".to_string(),
    }
}

pub fn contact_message() -> NewContactMessage {
    NewContactMessage {
        name: "Avery".to_string(),
        email: "avery@example.com".to_string(),
        subject: "Fostering".to_string(),
        message: "Do you need foster homes?".to_string(),
    }
}

/// A stored, available listing.
pub fn adoption_pet(pet_name: &str, created_at: DateTime<Utc>) -> AdoptionPet {
    AdoptionPet {
        id: Uuid::new_v4(),
        pet_name: pet_name.to_string(),
        pet_type: "Dog".to_string(),
        breed: Some("Mixed".to_string()),
        age: Some("3 years".to_string()),
        color: None,
        description: None,
        location: "Central Shelter".to_string(),
        image_url: None,
        status: ListingStatus::Available,
        created_at,
    }
}

/// A stored, pending application for `pet`.
pub fn stored_application(pet: &AdoptionPet, created_at: DateTime<Utc>) -> AdoptionApplication {
    AdoptionApplication {
        id: Uuid::new_v4(),
        pet_id: pet.id,
        user_id: Uuid::new_v4(),
        applicant_name: "Morgan".to_string(),
        applicant_email: "morgan@example.com".to_string(),
        applicant_phone: Some("555-0199".to_string()),
        reason: Some("Companion".to_string()),
        living_situation: Some("House".to_string()),
        experience: Some("Some".to_string()),
        status: ApplicationStatus::Pending,
        created_at,
        pet_name: pet.pet_name.clone(),
        pet_type: pet.pet_type.clone(),
        pet_breed: pet.breed.clone(),
    }
}

/// A stored, unread contact message.
pub fn stored_message(name: &str, subject: &str, created_at: DateTime<Utc>) -> ContactMessage {
    ContactMessage {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        subject: subject.to_string(),
        message: "Hello".to_string(),
        read: false,
        created_at,
    }
}
