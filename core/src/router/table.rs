//! Compiled, validated route table
//!
//! Definitions are flattened depth-first (a parent before its children,
//! siblings in declaration order). That order is the match order.

use super::pattern::{Params, PathPattern};
use super::route::{PageRef, RouteDefinition, RouteTarget};
use crate::error::ConfigError;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Default bound on redirect hops
pub const DEFAULT_MAX_REDIRECT_HOPS: usize = 8;

/// One flattened route with its full pattern
#[derive(Debug, Clone)]
pub struct RouteRecord {
    /// Unique route name
    pub name: String,
    /// Full pattern including every ancestor's path
    pub pattern: PathPattern,
    /// Page or redirect, as declared
    pub target: RouteTarget,
    /// Declared metadata
    pub meta: BTreeMap<String, String>,
    /// Names from the outermost ancestor down to this route
    pub chain: Vec<String>,
    destination: usize,
}

impl RouteRecord {
    /// Whether this record redirects
    pub fn is_redirect(&self) -> bool {
        matches!(self.target, RouteTarget::Redirect(_))
    }
}

/// Immutable route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    /// Compile and validate definitions with the default redirect bound
    pub fn new(definitions: &[RouteDefinition]) -> Result<Self, ConfigError> {
        Self::with_max_redirect_hops(definitions, DEFAULT_MAX_REDIRECT_HOPS)
    }

    /// Compile and validate definitions
    pub fn with_max_redirect_hops(
        definitions: &[RouteDefinition],
        max_redirect_hops: usize,
    ) -> Result<Self, ConfigError> {
        if definitions.is_empty() {
            return Err(ConfigError::NoRoutes);
        }

        let mut table = Self {
            records: Vec::new(),
            by_name: HashMap::new(),
        };

        let root = PathPattern::parse("/")?;
        for definition in definitions {
            table.flatten(definition, &root, &[])?;
        }

        table.link_redirects(max_redirect_hops)?;

        debug!(routes = table.records.len(), "Route table compiled");
        Ok(table)
    }

    fn flatten(
        &mut self,
        definition: &RouteDefinition,
        parent: &PathPattern,
        ancestors: &[String],
    ) -> Result<(), ConfigError> {
        if self.by_name.contains_key(&definition.name) {
            return Err(ConfigError::DuplicateName {
                name: definition.name.clone(),
            });
        }

        let pattern = parent.join(&definition.path)?;
        let mut chain = ancestors.to_vec();
        chain.push(definition.name.clone());

        let index = self.records.len();
        self.by_name.insert(definition.name.clone(), index);
        self.records.push(RouteRecord {
            name: definition.name.clone(),
            pattern: pattern.clone(),
            target: definition.target.clone(),
            meta: definition.meta.clone(),
            chain: chain.clone(),
            destination: index,
        });

        for child in &definition.children {
            self.flatten(child, &pattern, &chain)?;
        }

        Ok(())
    }

    /// Follow every redirect chain once, recording where it ends
    fn link_redirects(&mut self, max_hops: usize) -> Result<(), ConfigError> {
        for index in 0..self.records.len() {
            let mut current = index;
            let mut chain = vec![self.records[index].name.clone()];

            while let RouteTarget::Redirect(target) = &self.records[current].target {
                let next = *self.by_name.get(target).ok_or_else(|| {
                    ConfigError::UnknownRedirectTarget {
                        route: self.records[current].name.clone(),
                        target: target.clone(),
                    }
                })?;

                let revisits = chain.contains(target);
                chain.push(target.clone());
                if revisits || chain.len() - 1 > max_hops {
                    return Err(ConfigError::RedirectLoop { chain });
                }
                current = next;
            }

            if current != index {
                let source = &self.records[index];
                let destination = &self.records[current];
                let available: Vec<&str> = source.pattern.required_params().collect();
                if let Some(param) = destination
                    .pattern
                    .required_params()
                    .find(|p| !available.contains(p))
                {
                    return Err(ConfigError::RedirectParameter {
                        route: source.name.clone(),
                        target: destination.name.clone(),
                        param: param.to_string(),
                    });
                }
            }

            self.records[index].destination = current;
        }

        Ok(())
    }

    /// All records in match order
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Number of routes, nested ones included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a route by name
    pub fn get(&self, name: &str) -> Option<&RouteRecord> {
        self.by_name.get(name).map(|&index| &self.records[index])
    }

    /// First record, in table order, whose pattern matches the segments
    pub fn find(&self, segments: &[String], case_sensitive: bool) -> Option<(&RouteRecord, Params)> {
        self.records.iter().find_map(|record| {
            record
                .pattern
                .matches(segments, case_sensitive)
                .map(|params| (record, params))
        })
    }

    /// Where a record ends up after its redirects, with the page it shows
    pub fn destination(&self, record: &RouteRecord) -> (&RouteRecord, &PageRef) {
        let mut target = &self.records[record.destination];
        loop {
            match &target.target {
                RouteTarget::Page(page) => return (target, page),
                // Linked at construction; a destination is always a page record.
                RouteTarget::Redirect(_) => target = &self.records[target.destination],
            }
        }
    }
}
