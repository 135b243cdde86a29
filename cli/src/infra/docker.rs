//! Infrastructure implementation of the `ImageBuilder` port using `docker build`.

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, Execution, ImageBuilder, ImageSpec, command_line};

/// Builds images with the docker CLI, streaming build output to the terminal.
pub struct DockerImageBuilder<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> DockerImageBuilder<R> {
    pub fn new(runner: R, program: &str) -> Self {
        Self {
            runner,
            program: program.to_string(),
        }
    }
}

/// Arguments for `docker build --no-cache -t <image> [-f <dockerfile>] <context>`.
#[must_use]
pub fn build_args<'a>(spec: &ImageSpec<'a>) -> Vec<&'a str> {
    let mut args = vec!["build", "--no-cache", "-t", spec.image];
    if let Some(dockerfile) = spec.dockerfile {
        args.push("-f");
        args.push(dockerfile);
    }
    args.push(spec.context);
    args
}

impl<R: CommandRunner> ImageBuilder for DockerImageBuilder<R> {
    async fn build(&self, spec: &ImageSpec<'_>) -> Result<Execution> {
        let args = build_args(spec);
        let status = self
            .runner
            .run_status(&self.program, &args, None)
            .await
            .with_context(|| format!("building {}", spec.image))?;
        Ok(Execution::inherited(command_line(&self.program, &args), status))
    }
}
