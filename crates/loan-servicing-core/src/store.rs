//! Volatile keyed loan store.
//!
//! The engine and mutators only ever see a `&mut Loan`; callers own the
//! store and inject any implementation of [`LoanStore`].

use std::collections::HashMap;

use crate::loan::Loan;

/// Keyed loan persistence.
pub trait LoanStore {
    fn get(&self, id: &str) -> Option<Loan>;
    fn put(&mut self, loan: Loan);
    fn delete(&mut self, id: &str) -> bool;
}

/// Process-lifetime in-memory store. No durability guarantee.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    loans: HashMap<String, Loan>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoanStore for InMemoryStore {
    fn get(&self, id: &str) -> Option<Loan> {
        self.loans.get(id).cloned()
    }

    fn put(&mut self, loan: Loan) {
        self.loans.insert(loan.id.clone(), loan);
    }

    fn delete(&mut self, id: &str) -> bool {
        self.loans.remove(id).is_some()
    }
}
