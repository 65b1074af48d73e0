//! Scaffold Service - the rendering engine.
//!
//! One call to [`ScaffoldService::execute`] is one batch:
//! 1. Inject context into every builder and render it into a `FileModel`
//! 2. Run the plugin pipeline over the rendered file set
//! 3. Write the files, honoring each model's conflict policy
//!
//! Nothing is written when rendering or a plugin fails, or when a file with
//! the `Error` policy already exists.

use std::{collections::btree_map::Entry, path::Path};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
        services::plugin::Plugin,
    },
    domain::{
        DomainError, FileBuilder, FileModel, IfExistsAction, Inserter, Resource, Template,
        TemplateBody, Universe, default_funcs, filter_existing, format_go_source,
        insert_fragments, resource::has_placeholders,
    },
    error::{Context, KscaffResult},
};

/// Main scaffolding engine.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl ScaffoldService {
    /// Create a new engine with the given adapters and no plugins.
    pub fn new(filesystem: Box<dyn Filesystem>, renderer: Box<dyn TemplateRenderer>) -> Self {
        Self {
            filesystem,
            renderer,
            plugins: Vec::new(),
        }
    }

    /// Append a plugin to the pipeline.
    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Filesystem the engine writes to, for scaffolders that read back.
    pub fn filesystem(&self) -> &dyn Filesystem {
        self.filesystem.as_ref()
    }

    /// Render `builders` in order, run the plugins and write the result.
    #[instrument(skip_all, fields(builders = builders.len()))]
    pub fn execute(&self, universe: &mut Universe, builders: Vec<FileBuilder>) -> KscaffResult<()> {
        universe.files.clear();

        for builder in builders {
            match builder {
                FileBuilder::Template(mut template) => {
                    self.build_template(universe, template.as_mut())?
                }
                FileBuilder::Inserter(mut inserter) => {
                    self.build_inserter(universe, inserter.as_mut())?
                }
            }
        }

        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), "Running plugin");
            plugin
                .pipe(universe)
                .map_err(|cause| ApplicationError::Plugin {
                    name: plugin.name().to_string(),
                    cause: Box::new(cause),
                })?;
        }

        self.check_conflicts(universe)?;
        for model in universe.files.values() {
            self.write(model)?;
        }

        info!(files = universe.files.len(), "Batch written");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn build_template(&self, universe: &mut Universe, template: &mut dyn Template) -> KscaffResult<()> {
        universe.inject(&mut *template);
        let spec = template.spec();
        let path = resolve_path(&spec.path, template.context().resource.as_ref())?;

        template
            .validate(&path)
            .and_then(|()| template.set_defaults())
            .map_err(|cause| ApplicationError::TemplateValidation {
                path: path.clone(),
                cause,
            })?;

        let contents = match spec.body {
            TemplateBody::Literal(contents) => contents,
            TemplateBody::Parameterized(body) => {
                let mut funcs = default_funcs();
                funcs.extend(template.funcs());
                let data = template
                    .render_data()
                    .context(format!("failed to serialize render data for {path}"))?;
                self.renderer.render(&path, body, &data, &funcs)?
            }
        };
        let contents = format_if_go(&path, contents, &universe.config.repo)?;
        debug!(path = %path, "Rendered template");

        let model = FileModel {
            path,
            contents,
            if_exists: spec.if_exists,
        };
        match universe.files.entry(model.path.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(model);
            }
            Entry::Occupied(mut entry) => match model.if_exists {
                IfExistsAction::Skip => debug!(path = %model.path, "Keeping earlier model"),
                IfExistsAction::Error => {
                    return Err(ApplicationError::ModelAlreadyExists { path: model.path }.into());
                }
                IfExistsAction::Overwrite => {
                    entry.insert(model);
                }
            },
        }
        Ok(())
    }

    fn build_inserter(&self, universe: &mut Universe, inserter: &mut dyn Inserter) -> KscaffResult<()> {
        universe.inject(&mut *inserter);
        let path = resolve_path(&inserter.path(), inserter.context().resource.as_ref())?;

        inserter
            .validate(&path)
            .map_err(|cause| ApplicationError::TemplateValidation {
                path: path.clone(),
                cause,
            })?;

        let existing = self.load_target(universe, &path)?;

        let markers = inserter.markers();
        let mut fragments = inserter.code_fragments();
        fragments.retain(|marker, _| markers.contains(marker));
        let fragments = filter_existing(&existing, fragments);

        let contents = insert_fragments(&existing, &fragments);
        let contents = format_if_go(&path, contents, &universe.config.repo)?;
        debug!(path = %path, markers = fragments.len(), "Updated file");

        universe.files.insert(
            path.clone(),
            FileModel {
                path,
                contents,
                if_exists: IfExistsAction::Overwrite,
            },
        );
        Ok(())
    }

    /// Contents an inserter starts from: the batch model, the file on disk, or both.
    ///
    /// When both exist the model's own conflict policy decides.
    fn load_target(&self, universe: &Universe, path: &str) -> KscaffResult<String> {
        let on_disk = Path::new(path);
        let Some(model) = universe.files.get(path) else {
            return Ok(self.filesystem.read_to_string(on_disk)?);
        };

        if !self.filesystem.exists(on_disk)? {
            return Ok(model.contents.clone());
        }
        match model.if_exists {
            IfExistsAction::Skip => Ok(self.filesystem.read_to_string(on_disk)?),
            IfExistsAction::Overwrite => Ok(model.contents.clone()),
            IfExistsAction::Error => Err(ApplicationError::FileAlreadyExists {
                path: path.to_string(),
            }
            .into()),
        }
    }

    /// Fail the batch before its first write if any `Error` model is taken.
    fn check_conflicts(&self, universe: &Universe) -> KscaffResult<()> {
        let guarded = universe
            .files
            .values()
            .filter(|model| model.if_exists == IfExistsAction::Error);
        for model in guarded {
            if self.filesystem.exists(Path::new(&model.path))? {
                return Err(ApplicationError::FileAlreadyExists {
                    path: model.path.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn write(&self, model: &FileModel) -> KscaffResult<()> {
        let path = Path::new(&model.path);

        if self.filesystem.exists(path)? {
            match model.if_exists {
                IfExistsAction::Skip => {
                    warn!(path = %model.path, "File exists, skipping");
                    return Ok(());
                }
                IfExistsAction::Error => {
                    return Err(ApplicationError::FileAlreadyExists {
                        path: model.path.clone(),
                    }
                    .into());
                }
                IfExistsAction::Overwrite => {}
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, &model.contents)?;
        debug!(path = %model.path, "Wrote file");
        Ok(())
    }
}

fn resolve_path(path: &str, resource: Option<&Resource>) -> Result<String, DomainError> {
    let resolved = match resource {
        Some(resource) => resource.replace_path(path),
        None => path.to_string(),
    };
    if has_placeholders(&resolved) {
        return Err(DomainError::UnresolvedPlaceholder { path: resolved });
    }
    Ok(resolved)
}

fn format_if_go(path: &str, contents: String, repo: &str) -> KscaffResult<String> {
    if !path.ends_with(".go") {
        return Ok(contents);
    }
    match format_go_source(&contents, repo) {
        Ok(formatted) => Ok(formatted),
        Err(cause) => Err(ApplicationError::Format {
            path: path.to_string(),
            cause,
            raw: contents,
        }
        .into()),
    }
}
