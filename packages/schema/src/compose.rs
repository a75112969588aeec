//! Composition of raw schema layers into a [`SchemaRegistry`].
//!
//! Layers are applied in order and every entry is replaced whole: a pattern
//! or group defined by a later layer discards the earlier definition with
//! the same key. Group references are expanded and seeds are parsed once
//! here, so lookups never see raw markup.

use crate::definition::{AttributeDomain, ContentAlternative, ContentItem, PatternDefinition, SeedSet};
use crate::error::{SchemaError, SchemaResult};
use crate::raw::{RawAlternative, RawContentItem, RawPattern, RawSchema};
use crate::registry::SchemaRegistry;
use folio_seed::{parse_seed, Seed};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Build a registry from a base layer and overrides, later layers winning
#[instrument(skip_all)]
pub fn compose<I>(base: RawSchema, overrides: I) -> SchemaResult<SchemaRegistry>
where
    I: IntoIterator<Item = RawSchema>,
{
    let RawSchema {
        mut groups,
        mut patterns,
    } = base;

    for (layer, schema) in overrides.into_iter().enumerate() {
        for (name, items) in schema.groups {
            if groups.insert(name.clone(), items).is_some() {
                debug!(layer, group = %name, "group replaced");
            }
        }
        for (id, entry) in schema.patterns {
            if patterns.insert(id.clone(), entry).is_some() {
                debug!(layer, pattern = %id, "pattern replaced");
            }
        }
    }

    let expander = GroupExpander { groups: &groups };
    let mut definitions = BTreeMap::new();
    for (id, entry) in patterns {
        let definition = build_definition(&id, entry, &expander)?;
        definitions.insert(id, definition);
    }

    info!(
        patterns = definitions.len(),
        groups = groups.len(),
        "schema composed"
    );
    Ok(SchemaRegistry::new(definitions))
}

fn build_definition(
    id: &str,
    entry: RawPattern,
    expander: &GroupExpander<'_>,
) -> SchemaResult<PatternDefinition> {
    if id.is_empty() {
        return Err(SchemaError::malformed(id, "empty pattern id"));
    }
    if entry.element_name.as_deref() == Some("") {
        return Err(SchemaError::malformed(id, "empty element name"));
    }
    let element_name = entry.element_name.as_deref().unwrap_or(id);

    let mut attributes = BTreeMap::new();
    for (name, values) in entry.attributes {
        let domain = match values {
            None => AttributeDomain::Free,
            Some(values) if values.is_empty() => {
                return Err(SchemaError::malformed(
                    id,
                    format!("attribute '{}' enumerates no value", name),
                ));
            }
            Some(values) => AttributeDomain::enumerated(values),
        };
        attributes.insert(name, domain);
    }

    let mut content = Vec::new();
    for (index, raw) in entry.content.unwrap_or_default().iter().enumerate() {
        let items = expander.expand_alternative(id, raw)?;
        if items.is_empty() {
            return Err(SchemaError::malformed(
                id,
                format!("content alternative {} is empty", index),
            ));
        }
        content.push(ContentAlternative::new(items));
    }

    let mut seeds = SeedSet::default();
    if let Some(markup) = &entry.seed {
        seeds.default = Some(parse_checked_seed(id, element_name, "seed", markup)?);
    }
    for (variant, markup) in &entry.seed_variants {
        let seed = parse_checked_seed(id, element_name, variant, markup)?;
        seeds.variants.insert(variant.clone(), seed);
    }

    Ok(PatternDefinition {
        id: id.to_string(),
        declared_element: entry.element_name,
        attributes,
        content,
        seeds,
        metadata: entry.metadata,
    })
}

fn parse_checked_seed(id: &str, element_name: &str, label: &str, markup: &str) -> SchemaResult<Seed> {
    let seed = parse_seed(markup).map_err(|err| {
        SchemaError::malformed(id, format!("{} does not parse: {}", label, err))
    })?;

    if seed.root_tag() != element_name {
        return Err(SchemaError::malformed(
            id,
            format!(
                "{} root <{}> does not match element <{}>",
                label,
                seed.root_tag(),
                element_name
            ),
        ));
    }

    let markers = seed.markers();
    if markers.here != 1 {
        return Err(SchemaError::malformed(
            id,
            format!(
                "{} has {} focus markers, expected exactly one",
                label, markers.here
            ),
        ));
    }

    Ok(seed)
}

struct GroupExpander<'a> {
    groups: &'a BTreeMap<String, Vec<RawContentItem>>,
}

impl<'a> GroupExpander<'a> {
    fn expand_alternative(&self, owner: &str, raw: &RawAlternative) -> SchemaResult<Vec<ContentItem>> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        match raw {
            RawAlternative::Items(items) => self.expand_items(owner, items, &mut stack, &mut out)?,
            RawAlternative::Group(group) => {
                self.expand_group(owner, &group.group, &mut stack, &mut out)?
            }
        }
        Ok(out)
    }

    fn expand_items(
        &self,
        owner: &str,
        items: &[RawContentItem],
        stack: &mut Vec<&'a str>,
        out: &mut Vec<ContentItem>,
    ) -> SchemaResult<()> {
        for item in items {
            match item {
                RawContentItem::Member(id) if id.is_empty() => {
                    return Err(SchemaError::malformed(owner, "empty content member"));
                }
                RawContentItem::Member(id) => out.push(ContentItem::from_id(id)),
                RawContentItem::Group(group) => self.expand_group(owner, &group.group, stack, out)?,
            }
        }
        Ok(())
    }

    fn expand_group(
        &self,
        owner: &str,
        name: &str,
        stack: &mut Vec<&'a str>,
        out: &mut Vec<ContentItem>,
    ) -> SchemaResult<()> {
        let Some((key, items)) = self.groups.get_key_value(name) else {
            return Err(SchemaError::malformed(
                owner,
                format!("unknown group '{}'", name),
            ));
        };

        if stack.contains(&key.as_str()) {
            return Err(SchemaError::malformed(
                owner,
                format!("group cycle {} -> {}", stack.join(" -> "), name),
            ));
        }

        stack.push(key);
        self.expand_items(owner, items, stack, out)?;
        stack.pop();
        Ok(())
    }
}
