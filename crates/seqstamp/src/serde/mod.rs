use serde::{Deserializer, Serializer};

/// Serializes a [`MonotonicTimestamp`] as its filename-safe text form,
/// e.g. `"2024-05-01T12-30-45.000000000Z(3)"`.
///
/// ```
/// use seqstamp::MonotonicTimestamp;
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Event {
///     #[serde(with = "seqstamp::as_text_timestamp")]
///     at: MonotonicTimestamp,
/// }
/// ```
///
/// [`MonotonicTimestamp`]: crate::MonotonicTimestamp
pub mod as_text_timestamp {
    use super::{Deserializer, Serializer};
    use crate::MonotonicTimestamp;

    /// Serialize a timestamp as its canonical text form.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(ts: &MonotonicTimestamp, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(ts)
    }

    /// Deserialize a timestamp from its text form.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a timestamp, or carries trailing text
    pub fn deserialize<'de, D>(d: D) -> Result<MonotonicTimestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TextVisitor;

        impl serde::de::Visitor<'_> for TextVisitor {
            type Value = MonotonicTimestamp;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a monotonic timestamp string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(TextVisitor)
    }
}

/// Serializes an `i64` identifier as its 11-character URL-safe string, the
/// same form [`UniqueIdGenerator::next_string`] produces.
///
/// [`UniqueIdGenerator::next_string`]: crate::UniqueIdGenerator::next_string
pub mod as_base64_id {
    use super::{Deserializer, Serializer};
    use crate::{EncodedId, encode_to_buf};

    /// Serialize an identifier as its encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &i64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = EncodedId::default();
        encode_to_buf(*id, &mut buf);
        // The encoder only emits ASCII.
        let text = core::str::from_utf8(&buf).map_err(serde::ser::Error::custom)?;
        s.serialize_str(text)
    }

    /// Deserialize an identifier from its encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not an 11-character URL-safe base64 identifier
    pub fn deserialize<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Base64Visitor;

        impl serde::de::Visitor<'_> for Base64Visitor {
            type Value = i64;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("an 11-character URL-safe base64 identifier")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                crate::decode(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(Base64Visitor)
    }
}
