// Repository functions work on an in-memory snapshot of the collection; every
// mutation writes the full collection back through the `CardStore`.

pub mod card;
