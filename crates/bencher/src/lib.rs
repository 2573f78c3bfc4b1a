//! Shared fixtures for the parser benchmarks.

/// A named benchmark input.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    file: TestFile,
}

impl TestCase {
    pub const fn new(name: &'static str, file: TestFile) -> Self {
        Self { name, file }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn file_name(&self) -> &'static str {
        self.file.file_name
    }

    /// Input size, used for throughput reporting.
    pub fn len(&self) -> u64 {
        self.file.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.file.content.is_empty()
    }
}

/// A message head loaded from `resources/` at compile time.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.content.as_bytes()
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}
