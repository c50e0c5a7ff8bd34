//! Static language registry: maps editor-facing language ids to sandbox runtimes.

/// One supported language. `runtime_name`/`runtime_version` are what the
/// execution service understands; `id` is what the UI and CLI use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub runtime_name: &'static str,
    /// Pinned semantic version, or "*" for whatever the service offers.
    pub runtime_version: &'static str,
    pub file_extension: &'static str,
    pub starter_snippet: &'static str,
}

/// Registry in declaration order. `list()` preserves this order, so UI
/// selectors stay stable across calls.
const LANGUAGES: &[LanguageDescriptor] = &[
    LanguageDescriptor {
        id: "python",
        display_name: "Python",
        runtime_name: "python",
        runtime_version: "3.10.0",
        file_extension: "py",
        starter_snippet: "print(\"Hello, world!\")\n",
    },
    LanguageDescriptor {
        id: "javascript",
        display_name: "JavaScript",
        runtime_name: "javascript",
        runtime_version: "18.15.0",
        file_extension: "js",
        starter_snippet: "console.log(\"Hello, world!\");\n",
    },
    LanguageDescriptor {
        id: "typescript",
        display_name: "TypeScript",
        runtime_name: "typescript",
        runtime_version: "*",
        file_extension: "ts",
        starter_snippet: "console.log(\"Hello, world!\");\n",
    },
    LanguageDescriptor {
        id: "java",
        display_name: "Java",
        runtime_name: "java",
        runtime_version: "15.0.2",
        file_extension: "java",
        starter_snippet: "public class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, world!\");\n    }\n}\n",
    },
    LanguageDescriptor {
        id: "cpp",
        display_name: "C++",
        runtime_name: "cpp",
        runtime_version: "10.2.0",
        file_extension: "cpp",
        starter_snippet: "#include <iostream>\n\nint main() {\n    std::cout << \"Hello, world!\" << std::endl;\n    return 0;\n}\n",
    },
    LanguageDescriptor {
        id: "c",
        display_name: "C",
        runtime_name: "c",
        runtime_version: "10.2.0",
        file_extension: "c",
        starter_snippet: "#include <stdio.h>\n\nint main(void) {\n    printf(\"Hello, world!\\n\");\n    return 0;\n}\n",
    },
    LanguageDescriptor {
        id: "go",
        display_name: "Go",
        runtime_name: "go",
        runtime_version: "1.16.2",
        file_extension: "go",
        starter_snippet: "package main\n\nimport \"fmt\"\n\nfunc main() {\n    fmt.Println(\"Hello, world!\")\n}\n",
    },
    LanguageDescriptor {
        id: "rust",
        display_name: "Rust",
        runtime_name: "rust",
        runtime_version: "1.68.2",
        file_extension: "rs",
        starter_snippet: "fn main() {\n    println!(\"Hello, world!\");\n}\n",
    },
    LanguageDescriptor {
        id: "php",
        display_name: "PHP",
        runtime_name: "php",
        runtime_version: "8.2.3",
        file_extension: "php",
        starter_snippet: "<?php\necho \"Hello, world!\\n\";\n",
    },
    LanguageDescriptor {
        id: "ruby",
        display_name: "Ruby",
        runtime_name: "ruby",
        runtime_version: "*",
        file_extension: "rb",
        starter_snippet: "puts \"Hello, world!\"\n",
    },
    LanguageDescriptor {
        id: "bash",
        display_name: "Bash",
        runtime_name: "bash",
        runtime_version: "*",
        file_extension: "sh",
        starter_snippet: "echo \"Hello, world!\"\n",
    },
];

/// Look up a descriptor by id or common alias. Pure, no I/O; callers must
/// check the result before building a request.
pub fn resolve(language_id: &str) -> Option<&'static LanguageDescriptor> {
    let canonical = match language_id.to_ascii_lowercase().as_str() {
        "py" => "python",
        "js" | "node" => "javascript",
        "ts" => "typescript",
        "c++" => "cpp",
        "rs" => "rust",
        "rb" => "ruby",
        "sh" | "shell" => "bash",
        other => return LANGUAGES.iter().find(|l| l.id == other),
    };
    LANGUAGES.iter().find(|l| l.id == canonical)
}

/// All supported languages in declaration order.
pub fn list() -> &'static [LanguageDescriptor] {
    LANGUAGES
}

/// Look up a descriptor by source-file extension (e.g. "py", "rs").
pub fn resolve_extension(extension: &str) -> Option<&'static LanguageDescriptor> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    LANGUAGES.iter().find(|l| l.file_extension == ext)
}
