/// Fixed skill vocabulary, in the order results are reported.
pub const SKILL_VOCABULARY: &[&str] = &[
    // Programming languages
    "python",
    "java",
    "javascript",
    "c++",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "go",
    "rust",
    "scala",
    "r",
    "matlab",
    "sql",
    "html",
    "css",
    "typescript",
    // Frameworks and libraries
    "react",
    "angular",
    "vue",
    "django",
    "flask",
    "spring",
    "nodejs",
    "express",
    "bootstrap",
    "jquery",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "scikit-learn",
    // Databases
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "oracle",
    "sqlite",
    "cassandra",
    // Tools and platforms
    "git",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "jenkins",
    "ansible",
    "terraform",
    "linux",
    "unix",
    "bash",
    "powershell",
    "jira",
    "confluence",
    // Methodologies
    "agile",
    "scrum",
    "kanban",
    "devops",
    "ci/cd",
    "tdd",
    "bdd",
];

/// Returns every vocabulary term contained in `text`, case-insensitively.
///
/// Matching is plain substring containment, so short terms (`r`, `go`) match
/// inside longer words. Each term is reported at most once, in vocabulary order.
pub fn extract_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for &skill in SKILL_VOCABULARY {
        if text_lower.contains(skill) && !found.iter().any(|s| s == skill) {
            found.push(skill.to_string());
        }
    }

    found
}
