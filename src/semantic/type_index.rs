//! In-memory type resolver built from element trees.
//!
//! Types are registered per project under their qualified name
//! (`package.Type`, `package.Outer.Inner`). [`TypeInfo`] is built on first
//! use and cached; a type that is still being built is not re-entered, which
//! keeps cyclic `extends` chains from recursing forever. Only types built at
//! the top of a lookup are cached.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::imports::{import_to_regex, imports_name, is_wildcard_import};
use super::resolver::{LookupContext, TypeResolver};
use super::type_info::{Member, TypeInfo};
use crate::syntax::{Element, GateType, ParamType, Tag};

type TypeKey = (SmolStr, SmolStr);

#[derive(Debug, Clone)]
struct TypeEntry {
    name: SmolStr,
    qualified_name: SmolStr,
    file: SmolStr,
    /// Qualified name of the enclosing type, for inner types.
    enclosing: Option<SmolStr>,
    element: Arc<Element>,
}

#[derive(Debug, Clone, Default)]
struct FileEntry {
    project: SmolStr,
    package: SmolStr,
    imports: Vec<SmolStr>,
}

/// Where a lookup starts from, once its context is known.
struct Origin<'a> {
    project: &'a SmolStr,
    file: Option<&'a FileEntry>,
    enclosing: Option<SmolStr>,
}

#[derive(Debug, Default)]
pub struct TypeIndex {
    /// Keyed by `(project, qualified name)`, in registration order.
    types: IndexMap<TypeKey, TypeEntry>,
    /// Project that first registered a qualified name.
    owners: FxHashMap<SmolStr, SmolStr>,
    files: FxHashMap<SmolStr, FileEntry>,
    expected_packages: FxHashMap<SmolStr, String>,
    cache: RwLock<FxHashMap<TypeKey, Arc<TypeInfo>>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every type of a `ned-file` (or of each file under `files`).
    pub fn add_file(&mut self, project: &str, root: &Arc<Element>) {
        match root.tag() {
            Tag::Files => {
                for child in root.children_with_tag(Tag::NedFile) {
                    self.add_file(project, child);
                }
            }
            Tag::NedFile => self.add_ned_file(project, root),
            other => tracing::warn!("cannot index <{}> as a NED file", other),
        }
    }

    fn add_ned_file(&mut self, project: &str, root: &Arc<Element>) {
        let project = SmolStr::new(project);
        let file_name = SmolStr::new(root.attribute("filename"));
        let package = SmolStr::new(root.package_name());
        let imports = root
            .children_with_tag(Tag::Import)
            .map(|import| SmolStr::new(import.attribute("import-spec")))
            .collect();

        tracing::debug!(
            file = %file_name,
            package = %package,
            "indexing NED file"
        );

        for child in root.children() {
            if child.tag().is_type_declaration() {
                let qualified_name = if package.is_empty() {
                    SmolStr::new(child.name())
                } else {
                    SmolStr::new(format!("{}.{}", package, child.name()))
                };
                self.register(&project, &file_name, None, qualified_name, child);
            }
        }

        self.files.insert(
            file_name,
            FileEntry {
                project,
                package,
                imports,
            },
        );
        self.cache.write().clear();
    }

    fn register(
        &mut self,
        project: &SmolStr,
        file: &SmolStr,
        enclosing: Option<SmolStr>,
        qualified_name: SmolStr,
        element: &Arc<Element>,
    ) {
        if let Some(types) = element.first_child(Tag::Types) {
            for inner in types.children() {
                if inner.tag().is_type_declaration() {
                    let inner_name = SmolStr::new(format!("{}.{}", qualified_name, inner.name()));
                    self.register(
                        project,
                        file,
                        Some(qualified_name.clone()),
                        inner_name,
                        inner,
                    );
                }
            }
        }

        tracing::trace!(project = %project, "registered type {}", qualified_name);
        self.owners
            .entry(qualified_name.clone())
            .or_insert_with(|| project.clone());
        self.types.insert(
            (project.clone(), qualified_name.clone()),
            TypeEntry {
                name: SmolStr::new(element.name()),
                qualified_name,
                file: file.clone(),
                enclosing,
                element: Arc::clone(element),
            },
        );
    }

    /// Declare the package a file is expected to have.
    pub fn set_expected_package(&mut self, file: &str, package: impl Into<String>) {
        self.expected_packages
            .insert(SmolStr::new(file), package.into());
    }

    /// Number of registered types, inner types included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, project: &str, qualified_name: &str) -> bool {
        self.types
            .contains_key(&(SmolStr::new(project), SmolStr::new(qualified_name)))
    }

    // ------------------------------------------------------------------
    // name resolution
    // ------------------------------------------------------------------

    fn origin<'a>(&'a self, context: &LookupContext) -> Option<Origin<'a>> {
        match context {
            LookupContext::File(file) => {
                let entry = self.files.get(file)?;
                Some(Origin {
                    project: &entry.project,
                    file: Some(entry),
                    enclosing: None,
                })
            }
            LookupContext::Type(qualified_name) => {
                let project = self.owners.get(qualified_name)?;
                let entry = self.types.get(&(project.clone(), qualified_name.clone()))?;
                Some(Origin {
                    project,
                    file: self.files.get(&entry.file),
                    enclosing: Some(qualified_name.clone()),
                })
            }
        }
    }

    fn resolve_key(&self, name: &str, context: &LookupContext) -> Option<TypeKey> {
        let Some(origin) = self.origin(context) else {
            // Unknown context: only fully qualified names can be resolved.
            let project = self.owners.get(name)?;
            return Some((project.clone(), SmolStr::new(name)));
        };
        let key = |qualified: &str| (origin.project.clone(), SmolStr::new(qualified));

        if name.contains('.') {
            let candidate = key(name);
            return self.types.contains_key(&candidate).then_some(candidate);
        }

        // enclosing types, innermost first
        let mut enclosing = origin.enclosing.clone();
        while let Some(outer) = enclosing {
            let candidate = key(format!("{outer}.{name}").as_str());
            if self.types.contains_key(&candidate) {
                return Some(candidate);
            }
            enclosing = self
                .types
                .get(&key(outer.as_str()))
                .and_then(|entry| entry.enclosing.clone());
        }

        let file = origin.file?;

        // same package
        let own = if file.package.is_empty() {
            key(name)
        } else {
            key(format!("{}.{}", file.package, name).as_str())
        };
        if self.types.contains_key(&own) {
            return Some(own);
        }

        // explicit imports
        for spec in file.imports.iter().filter(|spec| !is_wildcard_import(spec)) {
            if imports_name(spec, name) {
                let candidate = key(spec.as_str());
                if self.types.contains_key(&candidate) {
                    return Some(candidate);
                }
            }
        }

        // wildcard imports
        for spec in file.imports.iter().filter(|spec| is_wildcard_import(spec)) {
            let Ok(pattern) = import_to_regex(spec) else {
                continue;
            };
            let found = self.types.iter().find(|((project, qualified), entry)| {
                project == origin.project
                    && entry.enclosing.is_none()
                    && entry.name.as_str() == name
                    && pattern.is_match(qualified)
            });
            if let Some((found_key, _)) = found {
                return Some(found_key.clone());
            }
        }

        None
    }

    // ------------------------------------------------------------------
    // type info
    // ------------------------------------------------------------------

    fn type_info(&self, key: &TypeKey) -> Option<Arc<TypeInfo>> {
        if let Some(info) = self.cache.read().get(key) {
            return Some(Arc::clone(info));
        }
        let mut visiting = FxHashSet::default();
        self.build(key, &mut visiting)
    }

    fn build(&self, key: &TypeKey, visiting: &mut FxHashSet<TypeKey>) -> Option<Arc<TypeInfo>> {
        if let Some(info) = self.cache.read().get(key) {
            return Some(Arc::clone(info));
        }
        let entry = self.types.get(key)?;
        if !visiting.insert(key.clone()) {
            tracing::debug!("cyclic inheritance through {}", entry.qualified_name);
            return None;
        }

        let lookup_context = match &entry.enclosing {
            Some(outer) => LookupContext::Type(outer.clone()),
            None => LookupContext::File(entry.file.clone()),
        };
        let tag = entry.element.tag();
        let mut members: IndexMap<SmolStr, Member> = IndexMap::new();

        for extends in entry.element.children_with_tag(Tag::Extends) {
            let base = self
                .resolve_key(extends.name(), &lookup_context)
                .and_then(|base_key| self.build(&base_key, visiting));
            let Some(base) = base else {
                continue;
            };
            if base.tag() != tag {
                continue;
            }
            for (name, member) in &base.members {
                members
                    .entry(name.clone())
                    .or_insert_with(|| member.clone());
            }
        }

        let mut declare = |element: &Arc<Element>| {
            members
                .entry(SmolStr::new(element.name()))
                .or_insert_with(|| Member::new(Arc::clone(element), entry.qualified_name.clone()));
        };
        for section in entry.element.children() {
            match section.tag() {
                Tag::Parameters => section
                    .children_with_tag(Tag::Param)
                    .filter(|param| param.param_type() != ParamType::None)
                    .for_each(&mut declare),
                Tag::Gates => section
                    .children_with_tag(Tag::Gate)
                    .filter(|gate| gate.gate_type() != GateType::None)
                    .for_each(&mut declare),
                Tag::Types => section
                    .children()
                    .iter()
                    .filter(|inner| inner.tag().is_type_declaration())
                    .for_each(&mut declare),
                Tag::Submodules => section
                    .children_with_tag(Tag::Submodule)
                    .for_each(&mut declare),
                _ => {}
            }
        }

        visiting.remove(key);
        let info = Arc::new(TypeInfo {
            name: entry.name.clone(),
            qualified_name: entry.qualified_name.clone(),
            element: Arc::clone(&entry.element),
            lookup_context,
            members,
        });
        // built under an outer type, so it may be missing what a cycle cut off
        if visiting.is_empty() {
            self.cache.write().insert(key.clone(), Arc::clone(&info));
        }
        Some(info)
    }
}

impl TypeResolver for TypeIndex {
    fn lookup_type(&self, name: &str, context: &LookupContext) -> Option<Arc<TypeInfo>> {
        let key = self.resolve_key(name, context)?;
        self.type_info(&key)
    }

    fn lookup_toplevel_type(&self, qualified_name: &str, project: &str) -> Option<Arc<TypeInfo>> {
        let key = (SmolStr::new(project), SmolStr::new(qualified_name));
        match self.types.get(&key) {
            Some(entry) if entry.enclosing.is_none() => self.type_info(&key),
            _ => None,
        }
    }

    fn expected_package_for(&self, file: &str) -> Option<String> {
        self.expected_packages.get(file).cloned()
    }

    fn type_qualified_names(&self, project: &str) -> Vec<SmolStr> {
        self.types
            .iter()
            .filter(|((owner, _), entry)| owner.as_str() == project && entry.enclosing.is_none())
            .map(|(_, entry)| entry.qualified_name.clone())
            .collect()
    }
}
