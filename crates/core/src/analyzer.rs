use crate::config::ConvertConfig;
use crate::convert::Converter;
use crate::error::{DocError, Result};
use crate::index::{Index, populate_index};
use crate::model::Project;
use crate::parse::parse;
use crate::suffix_tree::{LookupError, SuffixTree};
use declscope_api::{Entity, Pathname};
use serde_json::Value;
use tracing::{info, warn};

/// Index a parsed document, then convert it.
///
/// Indexing fills in every node's computed path, so the project is borrowed
/// mutably once and only read afterwards.
pub fn index_and_convert(
    project: &mut Project,
    config: &ConvertConfig,
) -> Result<(Index, Vec<Entity>)> {
    let index = populate_index(project, &config.base_dir);
    let entities = Converter::new(&index, config).convert_all(project)?;
    Ok((index, entities))
}

/// Converted entities, addressable by path suffix.
pub struct Analyzer {
    index: Index,
    entities: Vec<Entity>,
    /// Positions into `entities`
    by_path: SuffixTree<usize>,
}

impl Analyzer {
    pub fn new(mut project: Project, config: &ConvertConfig) -> Result<Self> {
        let (index, entities) = index_and_convert(&mut project, config)?;

        let mut by_path = SuffixTree::new();
        for (position, entity) in entities.iter().enumerate() {
            let segments = entity.path().segments().to_vec();
            match by_path.add(segments, position) {
                Ok(()) => {}
                Err(err @ LookupError::DuplicatePath { .. }) if !config.strict => {
                    warn!(kind = entity.kind(), "{err}; keeping the first entity");
                }
                Err(err) => return Err(DocError::Lookup(err)),
            }
        }

        info!(
            nodes = index.len(),
            entities = entities.len(),
            addressable = by_path.len(),
            "analysis ready"
        );
        Ok(Self {
            index,
            entities,
            by_path,
        })
    }

    pub fn from_json(document: &Value, config: &ConvertConfig) -> Result<Self> {
        let project = parse(document)?;
        Self::new(project, config)
    }

    /// The unique entity whose path ends with `suffix`.
    pub fn get_object<S: AsRef<str>>(&self, suffix: &[S]) -> std::result::Result<&Entity, LookupError> {
        let position = *self.by_path.get(suffix)?;
        self.entities
            .get(position)
            .ok_or_else(|| LookupError::SuffixNotFound {
                suffix: suffix.iter().map(AsRef::as_ref).collect(),
            })
    }

    /// The unique entity a user-written namepath such as `util.greet` or
    /// `./lib/index.d.Widget#render` names.
    ///
    /// Every segmentation of the namepath is tried, since dotted file stems
    /// make the split ambiguous.
    pub fn resolve(&self, namepath: &str) -> std::result::Result<&Entity, LookupError> {
        let mut found: Vec<usize> = Vec::new();
        let mut candidates: Vec<String> = Vec::new();

        for suffix in Pathname::parse_alternatives(namepath) {
            match self.by_path.get(suffix.segments()) {
                Ok(&position) if !found.contains(&position) => found.push(position),
                Ok(_) | Err(LookupError::SuffixNotFound { .. }) => {}
                Err(LookupError::SuffixAmbiguous { candidates: more, .. }) => {
                    candidates.extend(more)
                }
                Err(err) => return Err(err),
            }
        }

        if candidates.is_empty() {
            if let [position] = found.as_slice() {
                if let Some(entity) = self.entities.get(*position) {
                    return Ok(entity);
                }
            }
        }
        if found.is_empty() && candidates.is_empty() {
            return Err(LookupError::SuffixNotFound {
                suffix: namepath.to_string(),
            });
        }

        candidates.extend(
            found
                .iter()
                .filter_map(|&position| self.entities.get(position))
                .map(|entity| entity.path().to_string()),
        );
        candidates.sort();
        candidates.dedup();
        Err(LookupError::SuffixAmbiguous {
            suffix: namepath.to_string(),
            candidates,
        })
    }

    /// Every converted entity, in conversion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn index(&self) -> &Index {
        &self.index
    }
}
