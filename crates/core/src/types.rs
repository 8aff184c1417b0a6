/// Discord-style 64-bit identifier for guilds, members, roles and channels.
pub type Snowflake = u64;

/// Guild member identity.
pub type MemberId = Snowflake;

/// Guild role identity.
pub type RoleId = Snowflake;

/// Text channel identity.
pub type ChannelId = Snowflake;

/// Guild identity.
pub type GuildId = Snowflake;

/// Serde helpers for snowflakes.
///
/// The Discord API encodes snowflakes as JSON strings while hand-written
/// configuration files usually carry plain numbers. Both are accepted.
pub mod snowflake {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    use super::Snowflake;

    pub fn serialize<S: Serializer>(value: &Snowflake, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Snowflake, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }

    struct SnowflakeVisitor;

    impl<'de> Visitor<'de> for SnowflakeVisitor {
        type Value = Snowflake;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a snowflake as an unsigned integer or a numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Snowflake, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Snowflake, E> {
            u64::try_from(v).map_err(|_| E::custom(format!("negative snowflake: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Snowflake, E> {
            v.parse()
                .map_err(|_| E::custom(format!("invalid snowflake: \"{v}\"")))
        }
    }

    /// Same as the parent module, for `Vec<Snowflake>` fields.
    pub mod vec {
        use serde::de::{SeqAccess, Visitor};
        use serde::Deserializer;

        use super::{Snowflake, SnowflakeVisitor};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<Snowflake>, D::Error> {
            struct SeqVisitor;

            impl<'de> Visitor<'de> for SeqVisitor {
                type Value = Vec<Snowflake>;

                fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    f.write_str("a list of snowflakes")
                }

                fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                    let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                    while let Some(Wrapped(id)) = seq.next_element()? {
                        out.push(id);
                    }
                    Ok(out)
                }
            }

            struct Wrapped(Snowflake);

            impl<'de> serde::Deserialize<'de> for Wrapped {
                fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                    d.deserialize_any(SnowflakeVisitor).map(Wrapped)
                }
            }

            deserializer.deserialize_seq(SeqVisitor)
        }
    }
}
