//! Header cards and ordered headers.

use std::fmt;

/// Maximum keyword length.
pub const KEYWORD_LEN: usize = 8;

/// Value carried by a header card.
#[derive(Debug, Clone, PartialEq)]
pub enum CardValue {
    Logical(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl CardValue {
    /// Returns the integer value, if this is an integer card.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CardValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string card.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CardValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardValue::Logical(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            CardValue::Int(v) => write!(f, "{}", v),
            CardValue::Float(v) => write!(f, "{}", v),
            CardValue::Str(s) => write!(f, "'{}'", s),
        }
    }
}

/// A single keyword = value / comment header entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Upper-cased keyword
    pub keyword: String,
    /// Card value
    pub value: CardValue,
    /// Free-text comment
    pub comment: String,
}

impl Card {
    /// Creates a card; the keyword is upper-cased.
    pub fn new(keyword: &str, value: CardValue, comment: &str) -> Self {
        Self {
            keyword: normalize_keyword(keyword),
            value,
            comment: comment.to_string(),
        }
    }
}

/// Canonical keyword spelling.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_ascii_uppercase()
}

/// Ordered collection of header cards with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    /// Creates an empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header from cards in the given order.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    fn position(&self, keyword: &str) -> Option<usize> {
        let keyword = normalize_keyword(keyword);
        self.cards.iter().position(|c| c.keyword == keyword)
    }

    /// Returns the card with the given keyword.
    pub fn card(&self, keyword: &str) -> Option<&Card> {
        self.position(keyword).map(|i| &self.cards[i])
    }

    /// Returns the value stored under the given keyword.
    pub fn get(&self, keyword: &str) -> Option<&CardValue> {
        self.card(keyword).map(|c| &c.value)
    }

    /// Returns an integer value stored under the given keyword.
    pub fn get_int(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(CardValue::as_int)
    }

    /// Returns a string value stored under the given keyword.
    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(CardValue::as_str)
    }

    /// Returns true if the keyword is present.
    pub fn contains(&self, keyword: &str) -> bool {
        self.position(keyword).is_some()
    }

    /// Sets a value, keeping the existing comment, or appends a new card.
    pub fn set(&mut self, keyword: &str, value: CardValue) {
        match self.position(keyword) {
            Some(i) => self.cards[i].value = value,
            None => self.cards.push(Card::new(keyword, value, "")),
        }
    }

    /// Sets value and comment, appending the card if absent.
    pub fn update(&mut self, keyword: &str, value: CardValue, comment: &str) {
        match self.position(keyword) {
            Some(i) => {
                self.cards[i].value = value;
                self.cards[i].comment = comment.to_string();
            }
            None => self.cards.push(Card::new(keyword, value, comment)),
        }
    }

    /// Appends a card without checking for an existing keyword.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes and returns the card with the given keyword.
    pub fn remove(&mut self, keyword: &str) -> Option<Card> {
        self.position(keyword).map(|i| self.cards.remove(i))
    }

    /// Keeps only the cards matching the predicate.
    pub fn retain(&mut self, f: impl FnMut(&Card) -> bool) {
        self.cards.retain(f);
    }

    /// Cards in header order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Iterates over the cards in header order.
    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
