use crate::application::dto::ContainerEngine;
use crate::audit::domain::ImageInspection;
use crate::ports::outbound::{CommandExecutor, CommandOutput, ContainerRuntime};
use crate::shared::Result;
use std::path::Path;

/// CliContainerRuntime adapter driving the `docker` or `podman` CLI
pub struct CliContainerRuntime<E> {
    executor: E,
    engine: ContainerEngine,
}

impl<E: CommandExecutor> CliContainerRuntime<E> {
    pub fn new(executor: E, engine: ContainerEngine) -> Self {
        Self { executor, engine }
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = self.executor.run(self.engine.program(), &args)?;
        if !output.is_success() {
            anyhow::bail!(
                "{} {} failed ({})",
                self.engine.program(),
                args.first().map(String::as_str).unwrap_or_default(),
                output.failure_details()
            );
        }
        Ok(output)
    }
}

impl<E: CommandExecutor> ContainerRuntime for CliContainerRuntime<E> {
    fn pull(&self, image: &str) -> Result<()> {
        self.run(&["pull", image]).map(|_| ())
    }

    fn save(&self, image: &str, archive: &Path) -> Result<()> {
        let archive = archive.to_string_lossy();
        self.run(&["save", image, "-o", &archive]).map(|_| ())
    }

    fn inspect(&self, image: &str) -> Result<ImageInspection> {
        let output = self.run(&["inspect", image])?;
        ImageInspection::from_inspect_json(&output.stdout)
    }

    fn remove(&self, image: &str) -> Result<()> {
        self.run(&["rmi", image]).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct ScriptedExecutor {
        output: CommandOutput,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedExecutor {
        fn new(output: CommandOutput) -> Self {
            Self {
                output,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandExecutor for &ScriptedExecutor {
        fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
            self.calls
                .borrow_mut()
                .push(format!("{} {}", program, args.join(" ")));
            Ok(self.output.clone())
        }
    }

    #[test]
    fn test_commands_use_configured_engine() {
        let executor = ScriptedExecutor::new(CommandOutput::success());
        let runtime = CliContainerRuntime::new(&executor, ContainerEngine::Podman);

        runtime.pull("quay.io/example/bundle:v1").unwrap();
        runtime
            .save("quay.io/example/bundle", Path::new("/tmp/work/bundle.tar"))
            .unwrap();
        runtime.remove("quay.io/example/bundle:v1").unwrap();

        assert_eq!(
            *executor.calls.borrow(),
            vec![
                "podman pull quay.io/example/bundle:v1",
                "podman save quay.io/example/bundle -o /tmp/work/bundle.tar",
                "podman rmi quay.io/example/bundle:v1",
            ]
        );
    }

    #[test]
    fn test_failed_pull_carries_stderr() {
        let executor = ScriptedExecutor::new(CommandOutput::failure(1, "manifest unknown"));
        let runtime = CliContainerRuntime::new(&executor, ContainerEngine::Docker);

        let err = runtime.pull("quay.io/example/missing:v1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "docker pull failed (exit status 1: manifest unknown)"
        );
    }

    #[test]
    fn test_inspect_parses_labels() {
        let executor = ScriptedExecutor::new(CommandOutput::success().with_stdout(
            r#"[{"Id":"sha256:abc","Created":"2021-06-01T10:00:00Z","Config":{"Labels":{"com.redhat.openshift.versions":"v4.6-v4.8"}}}]"#,
        ));
        let runtime = CliContainerRuntime::new(&executor, ContainerEngine::Docker);

        let inspection = runtime.inspect("quay.io/example/bundle:v1").unwrap();
        assert_eq!(inspection.id, "sha256:abc");
        assert_eq!(inspection.ocp_versions(), Some("v4.6-v4.8"));
    }
}
