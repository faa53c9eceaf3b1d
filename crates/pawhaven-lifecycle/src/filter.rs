// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search and facet predicates for listings.
//!
//! The free-text term is a case-insensitive substring match ORed across a
//! record's searchable fields. Facets are ANDed on top: `pet_type` is an exact
//! case-insensitive match (`all` or blank means any), `breed` and `location`
//! are substring matches. A blank filter keeps everything.

use serde::Deserialize;

use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, ContactMessage, FoundPetReport, LostPetReport, PetRecord,
};

/// A record that can be searched and faceted.
pub trait Searchable {
    /// Fields the free-text term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    fn pet_type(&self) -> Option<&str> {
        None
    }

    fn breed(&self) -> Option<&str> {
        None
    }

    fn location(&self) -> Option<&str> {
        None
    }
}

/// Free-text term plus optional facets, as sent by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PetFilter {
    pub search: String,
    pub pet_type: String,
    pub breed: String,
    pub location: String,
}

/// Filter for lost and found report listings.
pub type ReportFilter = PetFilter;

/// Filter for adoption listings.
pub type ListingFilter = PetFilter;

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn substring_facet(wanted: &str, value: Option<&str>) -> bool {
    let wanted = wanted.trim().to_lowercase();
    wanted.is_empty() || value.is_some_and(|v| contains_folded(v, &wanted))
}

impl PetFilter {
    /// A filter with only a search term.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.search.trim().is_empty()
            && self.type_facet().is_none()
            && self.breed.trim().is_empty()
            && self.location.trim().is_empty()
    }

    fn type_facet(&self) -> Option<&str> {
        let pet_type = self.pet_type.trim();
        (!pet_type.is_empty() && !pet_type.eq_ignore_ascii_case("all")).then_some(pet_type)
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty()
            || item
                .search_fields()
                .into_iter()
                .any(|field| contains_folded(field, &term));

        let matches_type = match self.type_facet() {
            None => true,
            Some(wanted) => item
                .pet_type()
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(wanted)),
        };

        matches_search
            && matches_type
            && substring_facet(&self.breed, item.breed())
            && substring_facet(&self.location, item.location())
    }

    /// Keeps matching items, preserving order.
    pub fn apply<T: Searchable>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_blank() {
            return items;
        }
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

impl Searchable for LostPetReport {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(5);
        fields.extend(self.pet_name.as_deref());
        fields.push(self.pet_type.as_str());
        fields.extend(self.breed.as_deref());
        fields.push(self.last_seen_location.as_str());
        fields.push(self.contact_name.as_str());
        fields
    }

    fn pet_type(&self) -> Option<&str> {
        Some(&self.pet_type)
    }

    fn breed(&self) -> Option<&str> {
        self.breed.as_deref()
    }

    fn location(&self) -> Option<&str> {
        Some(&self.last_seen_location)
    }
}

impl Searchable for FoundPetReport {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(4);
        fields.push(self.pet_type.as_str());
        fields.extend(self.breed.as_deref());
        fields.push(self.found_location.as_str());
        fields.push(self.contact_name.as_str());
        fields
    }

    fn pet_type(&self) -> Option<&str> {
        Some(&self.pet_type)
    }

    fn breed(&self) -> Option<&str> {
        self.breed.as_deref()
    }

    fn location(&self) -> Option<&str> {
        Some(&self.found_location)
    }
}

impl Searchable for AdoptionPet {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.pet_name.as_str(), self.pet_type.as_str()];
        fields.extend(self.breed.as_deref());
        fields.push(self.location.as_str());
        fields
    }

    fn pet_type(&self) -> Option<&str> {
        Some(&self.pet_type)
    }

    fn breed(&self) -> Option<&str> {
        self.breed.as_deref()
    }

    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
}

impl Searchable for AdoptionApplication {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.applicant_name.as_str(), self.pet_name.as_str()]
    }

    fn pet_type(&self) -> Option<&str> {
        Some(&self.pet_type)
    }

    fn breed(&self) -> Option<&str> {
        self.pet_breed.as_deref()
    }
}

impl Searchable for ContactMessage {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.subject.as_str(),
            self.email.as_str(),
        ]
    }
}

impl Searchable for PetRecord {
    fn search_fields(&self) -> Vec<&str> {
        match self {
            Self::Lost(r) => r.search_fields(),
            Self::Found(r) => r.search_fields(),
            Self::Adoption(r) => r.search_fields(),
            Self::Application(r) => r.search_fields(),
            Self::Contact(r) => r.search_fields(),
        }
    }

    fn pet_type(&self) -> Option<&str> {
        match self {
            Self::Lost(r) => Searchable::pet_type(r),
            Self::Found(r) => Searchable::pet_type(r),
            Self::Adoption(r) => Searchable::pet_type(r),
            Self::Application(r) => Searchable::pet_type(r),
            Self::Contact(r) => Searchable::pet_type(r),
        }
    }

    fn breed(&self) -> Option<&str> {
        match self {
            Self::Lost(r) => Searchable::breed(r),
            Self::Found(r) => Searchable::breed(r),
            Self::Adoption(r) => Searchable::breed(r),
            Self::Application(r) => Searchable::breed(r),
            Self::Contact(r) => Searchable::breed(r),
        }
    }

    fn location(&self) -> Option<&str> {
        match self {
            Self::Lost(r) => Searchable::location(r),
            Self::Found(r) => Searchable::location(r),
            Self::Adoption(r) => Searchable::location(r),
            Self::Application(r) => Searchable::location(r),
            Self::Contact(r) => Searchable::location(r),
        }
    }
}
