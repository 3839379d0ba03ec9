use serde::Serialize;
use serde_json::{Map, Value};

/// An ordered argument list that can be fingerprinted.
///
/// Each argument is converted to a [`serde_json::Value`] independently and
/// canonicalized: the entries of every object, at any depth, are sorted by
/// key. Two structurally equal arguments therefore serialize identically
/// whatever their field or insertion order, whether or not serde_json's
/// `preserve_order` feature is enabled somewhere in the build.
///
/// Implemented for:
///
/// * `()` - a call with no arguments
/// * tuples of 1 to 12 serializable values - one tuple element per argument
/// * `[T]`, `[T; N]` and `Vec<T>` - one element per argument
///
/// References to arguments serialize like the arguments themselves, so
/// `(&name, &id)` and `(name, id)` produce the same fingerprint.
///
/// # Examples
///
/// ```
/// use memoprint_core::CallArgs;
///
/// let values = (1, "a", [true]).to_arg_values().unwrap();
/// assert_eq!(values.len(), 3);
/// assert_eq!(values[2], serde_json::json!([true]));
/// ```
pub trait CallArgs {
    /// Converts every argument to its canonical JSON value, in order.
    fn to_arg_values(&self) -> Result<Vec<Value>, serde_json::Error>;

    /// Number of arguments in the list.
    fn arity(&self) -> usize;
}

impl CallArgs for () {
    fn to_arg_values(&self) -> Result<Vec<Value>, serde_json::Error> {
        Ok(Vec::new())
    }

    fn arity(&self) -> usize {
        0
    }
}

macro_rules! impl_call_args_for_tuple {
    ($arity:expr => $($name:ident . $idx:tt),+) => {
        impl<$($name: Serialize),+> CallArgs for ($($name,)+) {
            fn to_arg_values(&self) -> Result<Vec<Value>, serde_json::Error> {
                Ok(vec![$(canonical_value(&self.$idx)?),+])
            }

            fn arity(&self) -> usize {
                $arity
            }
        }
    };
}

impl_call_args_for_tuple!(1 => A.0);
impl_call_args_for_tuple!(2 => A.0, B.1);
impl_call_args_for_tuple!(3 => A.0, B.1, C.2);
impl_call_args_for_tuple!(4 => A.0, B.1, C.2, D.3);
impl_call_args_for_tuple!(5 => A.0, B.1, C.2, D.3, E.4);
impl_call_args_for_tuple!(6 => A.0, B.1, C.2, D.3, E.4, F.5);
impl_call_args_for_tuple!(7 => A.0, B.1, C.2, D.3, E.4, F.5, G.6);
impl_call_args_for_tuple!(8 => A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);
impl_call_args_for_tuple!(9 => A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8);
impl_call_args_for_tuple!(10 => A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9);
impl_call_args_for_tuple!(11 => A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10);
impl_call_args_for_tuple!(12 => A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11);

impl<T: Serialize> CallArgs for [T] {
    fn to_arg_values(&self) -> Result<Vec<Value>, serde_json::Error> {
        self.iter().map(canonical_value).collect()
    }

    fn arity(&self) -> usize {
        self.len()
    }
}

impl<T: Serialize, const N: usize> CallArgs for [T; N] {
    fn to_arg_values(&self) -> Result<Vec<Value>, serde_json::Error> {
        self.as_slice().to_arg_values()
    }

    fn arity(&self) -> usize {
        N
    }
}

impl<T: Serialize> CallArgs for Vec<T> {
    fn to_arg_values(&self) -> Result<Vec<Value>, serde_json::Error> {
        self.as_slice().to_arg_values()
    }

    fn arity(&self) -> usize {
        self.len()
    }
}

/// Converts `value` to JSON with the entries of every object sorted by key.
pub(crate) fn canonical_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value).map(canonicalize)
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, canonicalize(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
