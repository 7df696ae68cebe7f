use operator_audit::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// An image known to the mock registry
///
/// Each layer is a list of `(relative path, content)` files written when
/// the layer archive is unpacked.
#[derive(Debug, Clone, Default)]
pub struct MockImage {
    pub labels: Vec<(String, String)>,
    pub layers: Vec<Vec<(String, String)>>,
}

impl MockImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_layer(mut self, files: &[(&str, &str)]) -> Self {
        self.layers.push(
            files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
        );
        self
    }
}

#[derive(Default)]
struct State {
    images: HashMap<String, MockImage>,
    saved: HashMap<String, String>,
    calls: Vec<String>,
}

/// Mock CommandExecutor emulating a container engine and `tar`
///
/// `save` remembers which image an archive belongs to; unpacking that
/// archive writes a `manifest.json` naming one layer archive per layer, and
/// unpacking a layer archive writes its files.
#[derive(Default, Clone)]
pub struct MockCommandExecutor {
    state: Arc<Mutex<State>>,
}

impl MockCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, reference: &str, image: MockImage) -> Self {
        self.state
            .lock()
            .unwrap()
            .images
            .insert(reference.to_string(), image);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn layer_name(reference: &str, index: usize) -> String {
        let dir: String = reference
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_{}/layer.tar", dir, index)
    }

    fn engine(&self, args: &[String]) -> CommandOutput {
        let state = self.state.lock().unwrap();
        let image = args.get(1).cloned().unwrap_or_default();
        let known = state.images.get(&image).cloned();
        drop(state);

        match (args.first().map(String::as_str), known) {
            (Some("pull"), Some(_)) | (Some("rmi"), _) => CommandOutput::success(),
            (Some("save"), Some(_)) => {
                let archive = args.get(3).cloned().unwrap_or_default();
                self.state.lock().unwrap().saved.insert(archive, image);
                CommandOutput::success()
            }
            (Some("inspect"), Some(found)) => {
                let labels: serde_json::Map<String, serde_json::Value> = found
                    .labels
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect();
                let inspect = serde_json::json!([{
                    "Id": format!("sha256:{}", image.len()),
                    "Created": "2021-06-01T10:00:00Z",
                    "Config": { "Labels": labels },
                }]);
                CommandOutput::success().with_stdout(inspect.to_string())
            }
            _ => CommandOutput::failure(
                1,
                format!("Error: manifest unknown: {}", image),
            ),
        }
    }

    fn tar(&self, args: &[String]) -> Result<CommandOutput> {
        let archive = args.get(1).cloned().unwrap_or_default();
        let destination = Path::new(args.get(3).map(String::as_str).unwrap_or_default());
        let state = self.state.lock().unwrap();

        if let Some(reference) = state.saved.get(&archive) {
            let image = &state.images[reference];
            let layers: Vec<String> = (0..image.layers.len())
                .map(|i| Self::layer_name(reference, i))
                .collect();
            let manifest = serde_json::json!([{ "Config": "config.json", "Layers": layers }]);
            fs::write(destination.join("manifest.json"), manifest.to_string())?;
            return Ok(CommandOutput::success());
        }

        for (reference, image) in &state.images {
            for (i, files) in image.layers.iter().enumerate() {
                if !archive.ends_with(&Self::layer_name(reference, i)) {
                    continue;
                }
                for (relative, content) in files {
                    let path = destination.join(relative);
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(path, content)?;
                }
                return Ok(CommandOutput::success());
            }
        }

        Ok(CommandOutput::failure(
            2,
            format!("tar: {}: Cannot open: No such file or directory", archive),
        ))
    }
}

impl CommandExecutor for MockCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(format!("{} {}", program, args.join(" ")));

        match program {
            "tar" => self.tar(args),
            _ => Ok(self.engine(args)),
        }
    }
}
