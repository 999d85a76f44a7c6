use taskd::task::{EnvVar, TaskDefinition};

/// Builder for `TaskDefinition` to simplify test setup.
pub struct TaskDefinitionBuilder {
    def: TaskDefinition,
}

impl TaskDefinitionBuilder {
    /// `command` is split on whitespace into program and arguments.
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            def: TaskDefinition {
                name: name.to_string(),
                command: command.split_whitespace().map(str::to_string).collect(),
                dir: String::new(),
                is_long: false,
                show_output: true,
                env: vec![],
                shell: String::new(),
            },
        }
    }

    /// Run `script` through `sh -c`.
    pub fn shell(name: &str, script: &str) -> Self {
        let mut builder = Self::new(name, "");
        builder.def.command = vec![script.to_string()];
        builder.def.shell = "sh".to_string();
        builder
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.def.command = args.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn long(mut self) -> Self {
        self.def.is_long = true;
        self
    }

    pub fn hide_output(mut self) -> Self {
        self.def.show_output = false;
        self
    }

    pub fn dir(mut self, dir: impl Into<String>) -> Self {
        self.def.dir = dir.into();
        self
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.def.env.push(EnvVar::new(name, value));
        self
    }

    pub fn with_shell(mut self, shell: &str) -> Self {
        self.def.shell = shell.to_string();
        self
    }

    pub fn build(self) -> TaskDefinition {
        self.def
    }
}
