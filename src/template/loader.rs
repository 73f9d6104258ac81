//! Template loader
//!
//! Parses YAML (or JSON) templates and expands CloudFormation short-hand
//! tags into their long-form mappings, so `!GetAtt Web.Arn` loads exactly
//! like `{"Fn::GetAtt": ["Web", "Arn"]}` would.
//!
//! The document is deserialized straight from the YAML events rather than
//! through an intermediate `Value`. A tagged plain scalar therefore keeps
//! its source text (`!Ref 1.10` stays `"1.10"`, `!Ref ~` stays `"~"`);
//! untagged nodes resolve exactly as plain `serde_yaml` resolves them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde_yaml::mapping::Entry;
use serde_yaml::{Mapping, Value};

use super::tags::{IntrinsicTag, TagArity};
use crate::error::{Location, ParseError};

/// A loaded template with every short-hand tag expanded
#[derive(Debug, Clone, PartialEq)]
pub struct Document(Value);

impl Document {
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Number of entries under the top-level `Resources` section
    pub fn resource_count(&self) -> usize {
        self.0
            .get("Resources")
            .and_then(Value::as_mapping)
            .map(Mapping::len)
            .unwrap_or(0)
    }

    /// Pretty JSON with 2-space indentation, mapping order preserved
    ///
    /// Null, boolean and numeric mapping keys are written as their JSON
    /// text (`~: a` becomes `"null": "a"`).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&with_string_keys(&self.0))
    }
}

/// Parser configuration: which tags are recognised and how they expand
///
/// Built locally and passed by reference; there is no global registry.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    tags: HashMap<&'static str, IntrinsicTag>,
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateLoader {
    /// Loader recognising all CloudFormation short-hand tags
    pub fn new() -> Self {
        let tags = IntrinsicTag::ALL
            .into_iter()
            .map(|tag| (tag.name(), tag))
            .collect();
        Self { tags }
    }

    /// Parse `raw` and expand all tags
    pub fn load(&self, raw: &str) -> Result<Document, ParseError> {
        let failure = RefCell::new(None);
        let seed = NodeSeed {
            loader: self,
            raw,
            failure: &failure,
        };
        match seed.deserialize(serde_yaml::Deserializer::from_str(raw)) {
            Ok(root) => Ok(Document(root)),
            // A tag problem is recorded before serde_yaml wraps it
            Err(err) => Err(failure.into_inner().unwrap_or_else(|| err.into())),
        }
    }

    fn lookup(&self, name: &str) -> Option<IntrinsicTag> {
        self.tags.get(name).copied()
    }
}

/// Parse with the default loader
pub fn load_template(raw: &str) -> Result<Document, ParseError> {
    TemplateLoader::new().load(raw)
}

/// Builds one node of the expanded tree
#[derive(Clone, Copy)]
struct NodeSeed<'a> {
    loader: &'a TemplateLoader,
    raw: &'a str,
    failure: &'a RefCell<Option<ParseError>>,
}

impl NodeSeed<'_> {
    /// Keep the typed error for `load` and hand serde_yaml a message
    fn fail<E: de::Error>(&self, error: ParseError) -> E {
        let message = error.to_string();
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(error);
        }
        E::custom(message)
    }

    fn expand<'de, A>(self, intrinsic: IntrinsicTag, payload: A) -> Result<Value, A::Error>
    where
        A: VariantAccess<'de>,
    {
        let argument = match intrinsic.arity() {
            TagArity::Scalar => Value::String(payload.newtype_variant_seed(ScalarPayload {
                node: self,
                intrinsic,
            })?),
            // Splits on every '.', so "A.B.C" gives three elements
            TagArity::DottedScalar => {
                let text = payload.newtype_variant_seed(ScalarPayload {
                    node: self,
                    intrinsic,
                })?;
                Value::Sequence(
                    text.split('.')
                        .map(|part| Value::String(part.to_string()))
                        .collect(),
                )
            }
            TagArity::Sequence => payload.newtype_variant_seed(SequencePayload {
                node: self,
                intrinsic,
            })?,
        };

        let mut mapping = Mapping::with_capacity(1);
        mapping.insert(Value::String(intrinsic.long_form().to_string()), argument);
        Ok(Value::Mapping(mapping))
    }
}

impl<'de> DeserializeSeed<'de> for NodeSeed<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

/// Untagged nodes resolve the way `serde_yaml::Value` resolves them
impl<'de> Visitor<'de> for NodeSeed<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Number(i.into()))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Value, E> {
        Ok(Value::Number(u.into()))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Number(f.into()))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_owned()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        self.deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(self)? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some(key) = map.next_key_seed(self)? {
            match mapping.entry(key) {
                Entry::Occupied(entry) => {
                    return Err(de::Error::custom(format_args!(
                        "duplicate entry with key {:?}",
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(map.next_value_seed(self)?);
                }
            }
        }
        Ok(Value::Mapping(mapping))
    }

    /// serde_yaml presents a `!Name` node as an enum whose variant is the tag
    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (name, payload) = data.variant::<String>()?;
        match self.loader.lookup(&name) {
            Some(intrinsic) => self.expand(intrinsic, payload),
            None => Err(self.fail(ParseError::UnknownTag {
                location: locate_tag(self.raw, &name),
                tag: name,
            })),
        }
    }
}

/// Payload of a scalar tag: the scalar's source text, unresolved
struct ScalarPayload<'a> {
    node: NodeSeed<'a>,
    intrinsic: IntrinsicTag,
}

impl<'de> DeserializeSeed<'de> for ScalarPayload<'_> {
    type Value = String;

    fn deserialize<D>(self, deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let node = self.node;
        let intrinsic = self.intrinsic;
        // serde_yaml only refuses a string request for a sequence or mapping
        deserializer.deserialize_str(RawText).map_err(|_| {
            node.fail(invalid_payload(intrinsic, "a scalar", "a sequence or mapping"))
        })
    }
}

struct RawText;

impl<'de> Visitor<'de> for RawText {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<String, E> {
        Ok(s.to_owned())
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<String, E> {
        Ok(s)
    }
}

/// Payload of a sequence tag: a list of nodes, each expanded in turn
struct SequencePayload<'a> {
    node: NodeSeed<'a>,
    intrinsic: IntrinsicTag,
}

impl SequencePayload<'_> {
    fn reject<E: de::Error>(&self, found: &'static str) -> E {
        self.node.fail(invalid_payload(self.intrinsic, "a sequence", found))
    }
}

impl<'de> DeserializeSeed<'de> for SequencePayload<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for SequencePayload<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a sequence after !{}", self.intrinsic.name())
    }

    fn visit_seq<A>(self, seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        self.node.visit_seq(seq)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Value, E> {
        Err(self.reject("a boolean"))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Value, E> {
        Err(self.reject("a number"))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Value, E> {
        Err(self.reject("a number"))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Value, E> {
        Err(self.reject("a number"))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Value, E> {
        Err(self.reject("a string"))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Err(self.reject("null"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Err(self.reject("null"))
    }

    fn visit_map<A>(self, _: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        Err(self.reject("a mapping"))
    }
}

fn invalid_payload(tag: IntrinsicTag, expected: &'static str, found: &'static str) -> ParseError {
    ParseError::InvalidPayload {
        tag: tag.name().to_string(),
        expected,
        found,
    }
}

/// Copy of `value` whose scalar mapping keys are all strings
fn with_string_keys(value: &Value) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .iter()
                .map(|(key, value)| (json_key(key), with_string_keys(value)))
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.iter().map(with_string_keys).collect()),
        other => other.clone(),
    }
}

fn json_key(key: &Value) -> Value {
    match key {
        Value::Null => Value::String("null".to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Number(n) => Value::String(n.to_string()),
        // Collection keys have no JSON form; serde_json reports them
        other => other.clone(),
    }
}

/// Best-effort position of the first `!name` token in the source.
///
/// The expanded tree carries no spans, so this rescans the text.
fn locate_tag(raw: &str, name: &str) -> Option<Location> {
    let needle = format!("!{}", name);
    for (line_idx, line) in raw.lines().enumerate() {
        let mut search_from = 0;
        while let Some(offset) = line[search_from..].find(&needle) {
            let start = search_from + offset;
            let end = start + needle.len();
            let prev_ok = line[..start]
                .chars()
                .next_back()
                .map_or(true, |c| c.is_whitespace() || "[{,:-".contains(c));
            let next_ok = line[end..]
                .chars()
                .next()
                .map_or(true, |c| c.is_whitespace() || "]},".contains(c));
            if prev_ok && next_ok {
                return Some(Location {
                    line: line_idx + 1,
                    column: line[..start].chars().count() + 1,
                });
            }
            search_from = end;
        }
    }
    None
}
