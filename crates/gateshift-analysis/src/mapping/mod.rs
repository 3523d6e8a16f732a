//! Converge → Elavon field mapping: dictionary, lookup, suggestions, plans.

pub mod dictionary;
pub mod mapper;
pub mod plan;
pub mod standard_fields;
pub mod store;
pub mod suggestions;

pub use dictionary::{EndpointMapping, MappingDictionary};
pub use mapper::MigrationMapper;
pub use plan::{FieldSubstitution, MigrationPlan};
pub use standard_fields::is_standard_field;
pub use store::{FieldResolution, MappingSnapshot, MappingStore, ReverseMapping};
pub use suggestions::{Level, MigrationSuggestion, SuggestionType};
