use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::config::automation_ids;
use crate::error::{AppError, Result};

/// Compiled selectors and patterns for one document walk.
pub struct Selectors {
    pub div: Selector,
    pub event_card: Regex,
    pub round_label: Selector,
    time: Selector,
    price: Selector,
    label: Selector,
    participant: Regex,
}

impl Selectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            div: selector("div[data-automation-id]")?,
            event_card: Regex::new(automation_ids::EVENT_CARD_PATTERN)?,
            round_label: by_id("*", automation_ids::ROUND_LABEL)?,
            time: by_id("span", automation_ids::EVENT_TIME)?,
            price: by_id("span", automation_ids::PRICE_TEXT)?,
            label: by_id("div", automation_ids::MARKET_LABEL)?,
            participant: Regex::new(automation_ids::PARTICIPANT_PATTERN)?,
        })
    }

    pub fn is_event_card(&self, el: &ElementRef) -> bool {
        el.value()
            .attr("data-automation-id")
            .is_some_and(|id| self.event_card.is_match(id))
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Selector(format!("{css}: {e}")))
}

fn by_id(tag: &str, id: &str) -> Result<Selector> {
    selector(&format!(r#"{tag}[data-automation-id="{id}"]"#))
}

/// What a single fixture section yielded. Missing pieces stay `None`/empty so the caller
/// can compare per-component counts across the whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionParts {
    pub time_text: Option<String>,
    pub labels: Vec<String>,
    pub prices: Vec<String>,
    /// `(home, away)`; set only when exactly one of each role is present.
    pub participants: Option<(String, String)>,
}

pub fn read_section(section: ElementRef, sel: &Selectors) -> SectionParts {
    let time_text = section.select(&sel.time).next().map(clean_text);
    let labels = section.select(&sel.label).map(clean_text).collect();
    let prices = section.select(&sel.price).map(clean_text).collect();

    let mut homes = Vec::new();
    let mut aways = Vec::new();
    for el in section.select(&sel.div) {
        let Some(id) = el.value().attr("data-automation-id") else {
            continue;
        };
        let Some(caps) = sel.participant.captures(id) else {
            continue;
        };
        match caps.get(1).map(|m| m.as_str()) {
            Some("one") => homes.push(clean_text(el)),
            Some("two") => aways.push(clean_text(el)),
            _ => {}
        }
    }
    let participants = match (homes.as_slice(), aways.as_slice()) {
        ([home], [away]) => Some((home.clone(), away.clone())),
        _ => None,
    };

    SectionParts {
        time_text,
        labels,
        prices,
        participants,
    }
}

/// Element text with newlines, tabs and runs of spaces collapsed.
pub fn clean_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
