//! Site member listing.
//!
//! Produces one [`MemberEntry`] per user in a ranked, paginated page of a
//! site's members. Each entry carries the user's profile fields and the ids
//! of the groups the user directly belongs to. Ids that look like site
//! groups (`g-` prefix) are kept only when the site itself declares them,
//! so a listing never leaks the site groups of other sites.

mod handler;
mod types;


pub use handler::MembersHandler;
pub use types::{MemberEntry, MembersError, MembersListing, MembersResult, SITE_GROUP_PREFIX};
