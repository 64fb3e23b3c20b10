// The full tier list a draft draws its pools from.

use std::collections::HashSet;

use tracing::debug;

use super::SourceError;
use crate::card::{Card, Category};
use crate::valuation::tiers::{assign_values, TierScoring};

/// Scored leader and lore lists. Values are recomputed whenever the scoring
/// mode or the membership of either list changes.
#[derive(Debug, Clone, PartialEq)]
pub struct TierList {
    leaders: Vec<Card>,
    lore: Vec<Card>,
    scoring: TierScoring,
}

impl TierList {
    /// Build a tier list, rejecting duplicate names within a category.
    pub fn new(
        leaders: Vec<Card>,
        lore: Vec<Card>,
        scoring: TierScoring,
    ) -> Result<Self, SourceError> {
        check_unique(&leaders, Category::Leader)?;
        check_unique(&lore, Category::Lore)?;
        let mut list = TierList {
            leaders,
            lore,
            scoring,
        };
        list.rescore();
        Ok(list)
    }

    pub fn scoring(&self) -> TierScoring {
        self.scoring
    }

    pub fn leaders(&self) -> &[Card] {
        &self.leaders
    }

    pub fn lore(&self) -> &[Card] {
        &self.lore
    }

    pub fn cards(&self, category: Category) -> &[Card] {
        match category {
            Category::Leader => &self.leaders,
            Category::Lore => &self.lore,
        }
    }

    /// Switch scoring mode and rescore both lists.
    pub fn set_scoring(&mut self, scoring: TierScoring) {
        self.scoring = scoring;
        self.rescore();
    }

    /// Append a card to a category and rescore that list.
    pub fn add(&mut self, category: Category, card: Card) -> Result<(), SourceError> {
        let scoring = self.scoring;
        let list = self.list_mut(category);
        if list.iter().any(|c| c.name == card.name) {
            return Err(SourceError::Validation(format!(
                "duplicate {category} '{}'",
                card.name
            )));
        }
        list.push(card);
        assign_values(list, scoring);
        Ok(())
    }

    /// Remove a card by name and rescore that list. Returns the removed card.
    pub fn remove(&mut self, category: Category, name: &str) -> Option<Card> {
        let scoring = self.scoring;
        let list = self.list_mut(category);
        let idx = list.iter().position(|c| c.name == name)?;
        let card = list.remove(idx);
        assign_values(list, scoring);
        Some(card)
    }

    fn list_mut(&mut self, category: Category) -> &mut Vec<Card> {
        match category {
            Category::Leader => &mut self.leaders,
            Category::Lore => &mut self.lore,
        }
    }

    fn rescore(&mut self) {
        assign_values(&mut self.leaders, self.scoring);
        assign_values(&mut self.lore, self.scoring);
        debug!(
            "Scored tier list ({}): {} leaders, {} lore",
            self.scoring.label(),
            self.leaders.len(),
            self.lore.len()
        );
    }
}

fn check_unique(cards: &[Card], category: Category) -> Result<(), SourceError> {
    let mut seen = HashSet::new();
    for card in cards {
        if !seen.insert(card.name.as_str()) {
            return Err(SourceError::Validation(format!(
                "duplicate {category} '{}'",
                card.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Tier;

    fn sample() -> TierList {
        TierList::new(
            vec![
                Card::new("Noble", Tier::S),
                Card::new("Archivist", Tier::S),
                Card::new("Quartermaster", Tier::B),
            ],
            vec![Card::new("Living Structures", Tier::A)],
            TierScoring::Varied,
        )
        .unwrap()
    }

    #[test]
    fn construction_scores_cards() {
        let list = sample();
        assert_eq!(list.leaders()[0].value, 5.25);
        assert_eq!(list.leaders()[1].value, 4.75);
        assert_eq!(list.leaders()[2].value, 3.0);
        assert_eq!(list.lore()[0].value, 4.0);
    }

    #[test]
    fn set_scoring_rescores() {
        let mut list = sample();
        list.set_scoring(TierScoring::Same);
        assert_eq!(list.leaders()[0].value, 5.0);
        assert_eq!(list.leaders()[1].value, 5.0);
        assert_eq!(list.scoring(), TierScoring::Same);
    }

    #[test]
    fn membership_changes_rescore() {
        let mut list = sample();
        list.remove(Category::Leader, "Archivist").unwrap();
        // Noble is now alone in S and loses its offset.
        assert_eq!(list.leaders()[0].value, 5.0);

        list.add(Category::Leader, Card::new("Elder", Tier::S)).unwrap();
        assert_eq!(list.cards(Category::Leader)[0].value, 5.25);
        assert_eq!(list.cards(Category::Leader)[2].value, 4.75);

        assert!(list.remove(Category::Lore, "Nope").is_none());
    }

    #[test]
    fn duplicates_are_rejected() {
        let result = TierList::new(
            vec![Card::new("Noble", Tier::S), Card::new("Noble", Tier::A)],
            Vec::new(),
            TierScoring::Same,
        );
        assert!(matches!(result, Err(SourceError::Validation(_))));

        let mut list = sample();
        assert!(list
            .add(Category::Lore, Card::new("Living Structures", Tier::C))
            .is_err());
    }
}
