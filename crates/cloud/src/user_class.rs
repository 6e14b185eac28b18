use serde::{Deserialize, Serialize};

/// Class of a requester, decides how much of a private datacenter a request may use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserClass {
    Gold,
    Silver,
    #[default]
    Bronze,
}
