//! Operation declarations

use serde::{Deserialize, Serialize};
use wire_codec::{WireDecode, WireEncode, WireType};

/// How a caller learns the outcome of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Delivery {
    /// The caller suspends until a reply arrives, even for void results
    Acknowledged,
    /// Fire-and-forget; the far side never replies
    Notification,
}

impl Delivery {
    pub fn is_oneway(&self) -> bool {
        matches!(self, Delivery::Notification)
    }
}

/// Compile-time description of one operation
///
/// ```
/// use module_contract::{Delivery, Operation, OperationSignature};
///
/// struct GetTitle;
///
/// impl Operation for GetTitle {
///     const NAME: &'static str = "getTitle";
///     type Params = ();
///     type Output = String;
/// }
///
/// let sig = OperationSignature::of::<GetTitle>();
/// assert_eq!(sig.name, "getTitle");
/// assert_eq!(sig.delivery, Delivery::Acknowledged);
/// ```
pub trait Operation: Send + Sync + 'static {
    /// Operation name, unique within its module
    const NAME: &'static str;

    /// Whether the caller waits for a reply
    const DELIVERY: Delivery = Delivery::Acknowledged;

    /// Whether the handler can reject a well-formed request
    const FALLIBLE: bool = false;

    /// Parameter record
    type Params: WireEncode + WireDecode + Send + Sync + 'static;

    /// Result type; `()` for void operations
    type Output: WireEncode + WireDecode + Send + Sync + 'static;
}

/// Runtime view of an [`Operation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSignature {
    pub name: String,
    pub params: WireType,
    pub output: WireType,
    pub delivery: Delivery,
    pub fallible: bool,
}

impl OperationSignature {
    /// Derives the signature from the operation's types
    pub fn of<O: Operation>() -> Self {
        Self {
            name: O::NAME.to_string(),
            params: <O::Params as WireEncode>::wire_type(),
            output: <O::Output as WireEncode>::wire_type(),
            delivery: O::DELIVERY,
            fallible: O::FALLIBLE,
        }
    }

    /// Checks if the operation produces no meaningful result
    pub fn is_void(&self) -> bool {
        self.output.is_unit()
    }
}
