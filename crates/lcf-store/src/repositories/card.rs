use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use lcf_srs::{Outcome, ReviewSchedule};
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{Card, CardFilter, NewCard},
    samples::sample_cards,
    store::CardStore,
};

/// Find a card by id.
pub fn find_card<'a>(cards: &'a [Card], id: &str) -> Option<&'a Card> {
    cards.iter().find(|card| card.id == id)
}

/// Cards matching `filter`, in collection order.
pub fn filter_cards<'a, Tz: TimeZone>(
    cards: &'a [Card],
    filter: &CardFilter,
    tz: &Tz,
) -> Vec<&'a Card> {
    cards
        .iter()
        .filter(|card| filter.matches(card, tz))
        .collect()
}

/// A copy of `cards` with the card sharing `updated`'s id replaced.
///
/// Every other card, and the order of the collection, is unchanged.
pub fn replace_card(cards: &[Card], updated: &Card) -> Vec<Card> {
    cards
        .iter()
        .map(|card| {
            if card.id == updated.id {
                updated.clone()
            } else {
                card.clone()
            }
        })
        .collect()
}

/// The card collection of the single study user.
///
/// Holds the collection in memory and writes it back to its [`CardStore`]
/// after every change. A change only becomes visible once the save succeeded.
#[derive(Debug, Clone)]
pub struct CardRepository {
    store: CardStore,
    cards: Arc<Mutex<Vec<Card>>>,
}

impl CardRepository {
    /// Load the collection from `store`.
    pub fn open(store: CardStore) -> Result<Self, StoreError> {
        let cards = store.load()?;
        tracing::info!(count = cards.len(), key = store.key(), "Card collection loaded");

        Ok(Self {
            store,
            cards: Arc::new(Mutex::new(cards)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Card>>, StoreError> {
        self.cards.lock().map_err(|_| StoreError::Poisoned)
    }

    fn commit(&self, cards: &mut Vec<Card>, next: Vec<Card>) -> Result<(), StoreError> {
        self.store.save(&next)?;
        *cards = next;
        Ok(())
    }

    /// Insert the starter deck when the collection is empty.
    ///
    /// Returns the number of cards inserted.
    pub fn seed_if_empty(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut cards = self.lock()?;
        if !cards.is_empty() {
            return Ok(0);
        }

        let samples = sample_cards(now);
        let count = samples.len();
        self.commit(&mut cards, samples)?;
        tracing::info!(count, "Seeded sample cards");

        Ok(count)
    }

    /// Snapshot of every card, in collection order.
    pub fn all(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn find(&self, id: &str) -> Result<Option<Card>, StoreError> {
        Ok(find_card(&self.lock()?, id).cloned())
    }

    /// Cards matching `filter`, with dates read in `tz`.
    pub fn filter<Tz: TimeZone>(
        &self,
        filter: &CardFilter,
        tz: &Tz,
    ) -> Result<Vec<Card>, StoreError> {
        let cards = self.lock()?;
        Ok(filter_cards(&cards, filter, tz)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Create a card from `new_card`, appended to the end of the collection.
    pub fn insert(&self, new_card: NewCard, now: DateTime<Utc>) -> Result<Card, StoreError> {
        let card = Card::new(Uuid::new_v4().to_string(), new_card, now);

        let mut cards = self.lock()?;
        let mut next = cards.clone();
        next.push(card.clone());
        self.commit(&mut cards, next)?;

        tracing::info!(card_id = %card.id, title = %card.title, "Card created");
        Ok(card)
    }

    /// Grade the card `id` at `now`.
    ///
    /// Returns `None` when no card has that id.
    pub fn grade<Tz: TimeZone>(
        &self,
        id: &str,
        outcome: Outcome,
        now: DateTime<Tz>,
    ) -> Result<Option<(Card, ReviewSchedule)>, StoreError> {
        let mut cards = self.lock()?;
        let Some(current) = find_card(&cards, id) else {
            return Ok(None);
        };

        let (updated, schedule) = current.graded(outcome, now);
        let next = replace_card(&cards, &updated);
        self.commit(&mut cards, next)?;

        tracing::info!(
            card_id = %updated.id,
            outcome = %outcome,
            status = %updated.status,
            interval = updated.interval,
            ease_factor = updated.ease_factor,
            "Card graded"
        );

        Ok(Some((updated, schedule)))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        kv::{KeyValueStore, MemoryStore},
        models::Difficulty,
        store::STORAGE_KEY,
    };
    use chrono::{Duration, FixedOffset};
    use lcf_srs::CardStatus;

    #[derive(Debug)]
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    fn new_card(title: &str, difficulty: Difficulty) -> NewCard {
        NewCard {
            title: title.to_string(),
            problem: "p".to_string(),
            solution: "s".to_string(),
            explanation: "e".to_string(),
            difficulty,
            tags: Vec::new(),
        }
    }

    fn memory_repository() -> (CardRepository, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let repository = CardRepository::open(CardStore::new(backend.clone())).unwrap();
        (repository, backend)
    }

    #[test]
    fn test_seed_if_empty_only_once() {
        let (repository, _) = memory_repository();

        assert_eq!(repository.seed_if_empty(now()).unwrap(), 5);
        assert_eq!(repository.seed_if_empty(now()).unwrap(), 0);
        assert_eq!(repository.len().unwrap(), 5);
    }

    #[test]
    fn test_insert_persists() {
        let (repository, backend) = memory_repository();

        let card = repository
            .insert(new_card("Two Sum", Difficulty::Easy), now())
            .unwrap();

        assert!(Uuid::parse_str(&card.id).is_ok());
        assert_eq!(repository.find(&card.id).unwrap(), Some(card.clone()));

        let stored = backend.get(STORAGE_KEY).unwrap().unwrap();
        let stored: Vec<Card> = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored, vec![card]);
    }

    #[test]
    fn test_grade_replaces_only_that_card() {
        let (repository, _) = memory_repository();
        repository.seed_if_empty(now()).unwrap();
        let before = repository.all().unwrap();

        let later = now() + Duration::hours(1);
        let (graded, schedule) = repository.grade("3", Outcome::Again, later).unwrap().unwrap();

        assert_eq!(graded.status, CardStatus::Learning);
        assert_eq!(graded.review_count, 1);
        assert_eq!(schedule.next_interval, 1);
        assert_eq!(graded.next_review, later + Duration::days(1));

        let after = repository.all().unwrap();
        assert_eq!(after.len(), before.len());
        for (old, new) in before.iter().zip(&after) {
            if old.id == "3" {
                assert_eq!(new, &graded);
            } else {
                assert_eq!(new, old);
            }
        }
    }

    #[test]
    fn test_grade_unknown_card() {
        let (repository, _) = memory_repository();
        repository.seed_if_empty(now()).unwrap();

        assert!(repository.grade("missing", Outcome::Good, now()).unwrap().is_none());
    }

    #[test]
    fn test_collection_survives_reopen() {
        let backend = Arc::new(MemoryStore::new());
        let repository = CardRepository::open(CardStore::new(backend.clone())).unwrap();
        repository.seed_if_empty(now()).unwrap();
        repository.grade("1", Outcome::Easy, now()).unwrap();

        let reopened = CardRepository::open(CardStore::new(backend)).unwrap();
        let card = reopened.find("1").unwrap().unwrap();
        assert_eq!(card.review_count, 1);
        assert_eq!(card.interval, 19);
    }

    #[test]
    fn test_repeated_easy_grades_stay_classifiable() {
        let (repository, _) = memory_repository();
        repository.seed_if_empty(now()).unwrap();

        for _ in 0..10 {
            repository.grade("1", Outcome::Easy, now()).unwrap();
        }

        let card = repository.find("1").unwrap().unwrap();
        assert_eq!(card.interval, u32::MAX);
        assert_eq!(card.next_review, lcf_srs::latest_review_date());

        let local_now = now().with_timezone(&FixedOffset::east_opt(3600).unwrap());
        let cards = repository.all().unwrap();
        let stats = lcf_srs::review_stats(&cards, &local_now);
        assert_eq!(stats.total_cards, 5);
        assert_eq!(lcf_srs::classify(&cards, &local_now).future.len(), 1);
    }

    #[test]
    fn test_grade_counts_days_in_graders_timezone() {
        let (repository, _) = memory_repository();
        repository.seed_if_empty(now()).unwrap();

        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let graded_at = tz.with_ymd_and_hms(2024, 3, 10, 23, 45, 0).unwrap();
        let (card, _) = repository.grade("2", Outcome::Again, graded_at).unwrap().unwrap();

        assert_eq!(
            card.next_review.with_timezone(&tz),
            tz.with_ymd_and_hms(2024, 3, 11, 23, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_failed_save_leaves_collection_unchanged() {
        let repository = CardRepository::open(CardStore::new(Arc::new(FailingStore))).unwrap();

        let result = repository.insert(new_card("Two Sum", Difficulty::Easy), now());

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(repository.is_empty().unwrap());
    }

    #[test]
    fn test_filter() {
        let (repository, _) = memory_repository();
        repository.seed_if_empty(now()).unwrap();

        let medium = CardFilter {
            difficulty: Some(Difficulty::Medium),
            ..CardFilter::default()
        };
        let found = repository.filter(&medium, &Utc).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");

        let everything = repository.filter(&CardFilter::default(), &Utc).unwrap();
        assert_eq!(everything.len(), 5);
    }

    #[test]
    fn test_replace_card_keeps_order() {
        let cards = sample_cards(now());
        let mut updated = cards[1].clone();
        updated.title = "Renamed".to_string();

        let replaced = replace_card(&cards, &updated);

        let ids: Vec<&str> = replaced.iter().map(|card| card.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(replaced[1].title, "Renamed");
        assert_eq!(replaced[0], cards[0]);
    }
}
