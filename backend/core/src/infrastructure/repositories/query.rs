// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Sorting and text matching shared by the in-memory stores.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::employee::Employee;
use crate::domain::page::{Direction, Page, PageRequest, Sort};
use crate::domain::topic::Topic;
use crate::domain::training::Training;

/// Property name that sorts by search relevance
pub const SCORE_PROPERTY: &str = "score";

/// Comparable value of one sort property. Missing values sort first.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum SortValue {
    Missing,
    Number(i64),
    Time(DateTime<Utc>),
    Text(String),
}

pub trait Sortable {
    fn sort_value(&self, property: &str) -> SortValue;

    /// Weighted text fields searched by `search`
    fn search_fields(&self) -> Vec<(&str, f64)>;
}

impl Sortable for Training {
    fn sort_value(&self, property: &str) -> SortValue {
        match property {
            "id" => self.id.map_or(SortValue::Missing, |id| SortValue::Number(id.0)),
            "name" => SortValue::Text(self.name.to_lowercase()),
            "createdAt" => self.created_at.map_or(SortValue::Missing, SortValue::Time),
            "scheduledOn" => self.scheduled_on.map_or(SortValue::Missing, SortValue::Time),
            "likesCount" => SortValue::Number(i64::from(self.likes_count)),
            "status" => SortValue::Text(self.status.as_str().to_string()),
            _ => SortValue::Missing,
        }
    }

    fn search_fields(&self) -> Vec<(&str, f64)> {
        let mut fields = vec![(self.name.as_str(), 2.0)];
        if let Some(description) = &self.description {
            fields.push((description.as_str(), 1.0));
        }
        fields
    }
}

impl Sortable for Topic {
    fn sort_value(&self, property: &str) -> SortValue {
        match property {
            "id" => self.id.map_or(SortValue::Missing, |id| SortValue::Number(id.0)),
            "name" => SortValue::Text(self.name.to_lowercase()),
            "trainings" => SortValue::Number(self.trainings.len() as i64),
            _ => SortValue::Missing,
        }
    }

    fn search_fields(&self) -> Vec<(&str, f64)> {
        let mut fields = vec![(self.name.as_str(), 2.0)];
        if let Some(description) = &self.description {
            fields.push((description.as_str(), 1.0));
        }
        fields
    }
}

impl Sortable for Employee {
    fn sort_value(&self, property: &str) -> SortValue {
        match property {
            "guid" => SortValue::Text(self.guid.as_str().to_string()),
            "name" => SortValue::Text(self.name.to_lowercase()),
            "email" => self
                .email
                .as_ref()
                .map_or(SortValue::Missing, |e| SortValue::Text(e.to_lowercase())),
            _ => SortValue::Missing,
        }
    }

    fn search_fields(&self) -> Vec<(&str, f64)> {
        let mut fields = vec![(self.name.as_str(), 2.0), (self.guid.as_str(), 1.0)];
        if let Some(email) = &self.email {
            fields.push((email.as_str(), 1.0));
        }
        fields
    }
}

/// Relevance of `item` for `term`: weighted count of term words found in
/// its searchable fields. Zero means no match.
pub fn relevance<T: Sortable>(item: &T, term: &str) -> f64 {
    let words: Vec<String> = term
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    item.search_fields()
        .into_iter()
        .map(|(text, weight)| {
            let text = text.to_lowercase();
            let hits = words.iter().filter(|w| text.contains(w.as_str())).count();
            hits as f64 * weight
        })
        .sum()
}

fn compare<T: Sortable>(a: &(f64, T), b: &(f64, T), sort: &Sort) -> Ordering {
    for order in &sort.orders {
        let ordering = if order.property == SCORE_PROPERTY {
            a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal)
        } else {
            a.1.sort_value(&order.property)
                .partial_cmp(&b.1.sort_value(&order.property))
                .unwrap_or(Ordering::Equal)
        };
        let ordering = match order.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Sort scored items per the request and cut out the requested page.
///
/// Items without a sort keep their incoming (key) order.
pub fn paginate<T: Sortable>(mut scored: Vec<(f64, T)>, request: &PageRequest) -> Page<T> {
    if let Some(sort) = &request.sort {
        scored.sort_by(|a, b| compare(a, b, sort));
    }
    Page::from_ordered(scored.into_iter().map(|(_, item)| item).collect(), request)
}

/// Score every item against `term`, dropping non-matches, then paginate.
pub fn search_page<T: Sortable>(items: Vec<T>, term: &str, request: &PageRequest) -> Page<T> {
    let term = term.trim();
    let scored = items
        .into_iter()
        .filter_map(|item| {
            if term.is_empty() {
                return Some((0.0, item));
            }
            let score = relevance(&item, term);
            (score > 0.0).then_some((score, item))
        })
        .collect();
    paginate(scored, request)
}

pub fn list_page<T: Sortable>(items: Vec<T>, request: &PageRequest) -> Page<T> {
    paginate(items.into_iter().map(|item| (0.0, item)).collect(), request)
}
