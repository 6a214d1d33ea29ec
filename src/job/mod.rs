/*!
 * Translation jobs as seen by a connector.
 *
 * - `model`: the job value the host hands to connectors
 * - `state`: lifecycle states and legal transitions
 * - `options`: connector-private metadata stored opaquely on the job
 */

pub mod model;
pub mod options;
pub mod state;

pub use model::{ContentField, FieldKind, JobContent, TranslationJob};
pub use options::JobOptions;
pub use state::{InvalidTransition, JobEvent, JobState};
