// Fusion Module - Candidate Union, Taxonomy Expansion, Term Selection
//
// Coordinator (fan-out/fan-in) → Normalizer → Taxonomy Matcher → Term Selector.
// Everything after the coordinator's join is pure and synchronous.

pub mod builtin_taxonomy;
pub mod coordinator;
pub mod matcher;
pub mod normalizer;
pub mod selector;
pub mod taxonomy;

pub use coordinator::{CandidateSet, SignalCoordinator, SignalReport, SignalStatus};
pub use matcher::{MatchBasis, MatchedTerm, MatchedTermSet, TaxonomyMatcher};
pub use selector::TermSelector;
pub use taxonomy::{Taxonomy, TaxonomyEntry, TaxonomyError};
