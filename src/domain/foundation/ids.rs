//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id! {
    /// Identifier of a user, as handed in by the authentication gateway.
    UserId
}

uuid_id! {
    /// Identifier of an audio episode in the catalog.
    EpisodeId
}

uuid_id! {
    /// Identifier of an audio series in the catalog.
    SeriesId
}

uuid_id! {
    /// Identifier of an entitlement record (paid access to one episode).
    EntitlementId
}

uuid_id! {
    /// Identifier of an external-gateway payment.
    PaymentId
}

uuid_id! {
    /// Identifier of an immutable ledger entry.
    LedgerEntryId
}

uuid_id! {
    /// Identifier of a purchasable coin bundle.
    BundleId
}
