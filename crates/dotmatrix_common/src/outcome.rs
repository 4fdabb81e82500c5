//! Success/diagnostic outcome type shared by the bus and instruction layers.
//!
//! The emulated machine keeps running through a number of conditions that a
//! host would normally call errors (Echo RAM accesses, word reads across a
//! region seam, PC wrap-around), so an outcome carries three things: the
//! payload, a statically enumerated diagnostic kind, and a per-instance
//! success flag. The same kind can therefore be a warning on one path and a
//! hard failure on another. Panics are reserved for internal table bugs.

/// A statically enumerated diagnostic kind.
///
/// The `DEFAULT` kind is the enum's first declared variant and is what the
/// plain [`Outcome::success`]/[`Outcome::failure`] constructors tag their
/// result with.
pub trait Kind: Copy + Eq + std::fmt::Debug {
    const DEFAULT: Self;

    /// Static description of this kind, independent of the payload.
    fn description(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug)]
pub struct Outcome<T, K: Kind> {
    kind: K,
    ok: bool,
    value: T,
}

impl<T, K: Kind> Outcome<T, K> {
    /// Successful outcome tagged with the default kind.
    pub fn success(value: T) -> Self {
        Self {
            kind: K::DEFAULT,
            ok: true,
            value,
        }
    }

    /// Failed outcome tagged with the default kind.
    pub fn failure(value: T) -> Self {
        Self {
            kind: K::DEFAULT,
            ok: false,
            value,
        }
    }

    /// Non-fatal diagnostic: the operation still counts as a success.
    pub fn accept(kind: K, value: T) -> Self {
        Self {
            kind,
            ok: true,
            value,
        }
    }

    /// Fatal diagnostic.
    pub fn reject(kind: K, value: T) -> Self {
        Self {
            kind,
            ok: false,
            value,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.ok
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        !self.ok
    }

    #[inline]
    pub fn kind(&self) -> K {
        self.kind
    }

    /// Structural match on the active kind, ignoring the success flag.
    #[inline]
    pub fn is_kind(&self, kind: K) -> bool {
        self.kind == kind
    }

    pub fn status_description(&self) -> &'static str {
        self.kind.description()
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Swap the payload while keeping kind and flag.
    pub fn replace<U>(self, value: U) -> Outcome<U, K> {
        Outcome {
            kind: self.kind,
            ok: self.ok,
            value,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, K> {
        Outcome {
            kind: self.kind,
            ok: self.ok,
            value: f(self.value),
        }
    }

    /// Upcast into a wider kind set without losing the kind's identity.
    pub fn widen<K2>(self) -> Outcome<T, K2>
    where
        K2: Kind + From<K>,
    {
        Outcome {
            kind: K2::from(self.kind),
            ok: self.ok,
            value: self.value,
        }
    }

    /// Collapse into a `Result`, keeping the kind as the error value.
    pub fn into_result(self) -> Result<T, K> {
        if self.ok {
            Ok(self.value)
        } else {
            Err(self.kind)
        }
    }
}
