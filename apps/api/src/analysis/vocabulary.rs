#![allow(dead_code)]

//! Vocabulary — the closed technical skills dictionary and the generic-word blocklist.
//!
//! A word that is not in the dictionary is never a keyword. The vocabulary is built
//! once at startup and shared read-only (`Arc<Vocabulary>` in `AppState`).

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use regex::Regex;

/// How a single term is searched for in free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchStrategy {
    /// `\b` around the term. Only sound when the term starts and ends on word characters.
    WordBoundary,
    /// Plain containment, for terms such as `c++`, `c#`, `node.js`.
    Substring,
}

pub(crate) fn strategy_for(lower_term: &str) -> MatchStrategy {
    if lower_term.ends_with('+') || lower_term.ends_with('#') || lower_term.contains('.') {
        MatchStrategy::Substring
    } else {
        MatchStrategy::WordBoundary
    }
}

/// Whole-word pattern for an already lowercased term.
pub(crate) fn boundary_regex(lower_term: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b{}\b", regex::escape(lower_term)))
}

/// Lowercases only when the input has something to fold.
fn fold_case(s: &str) -> Cow<'_, str> {
    if s.chars().all(|c| c.to_lowercase().eq(std::iter::once(c))) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.to_lowercase())
    }
}

/// A multi-word dictionary key with its precompiled whole-word pattern.
#[derive(Debug, Clone)]
pub struct PhraseKey {
    pub key: String,
    pattern: Regex,
}

impl PhraseKey {
    fn new(key: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            key: key.to_string(),
            pattern: boundary_regex(key)?,
        })
    }

    /// True when the phrase occurs in `lower_text` bounded by non-word characters.
    pub fn is_match(&self, lower_text: &str) -> bool {
        self.pattern.is_match(lower_text)
    }

    /// Blanks out every bounded occurrence of the phrase.
    pub fn erase<'t>(&self, lower_text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(lower_text, " ")
    }
}

/// Immutable skills dictionary: lowercase key → canonical display name, plus blocklist.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: IndexMap<String, String>,
    /// Whole-word patterns for every key matched with `MatchStrategy::WordBoundary`.
    boundary_patterns: HashMap<String, Regex>,
    phrases: Vec<PhraseKey>,
    blocked: HashSet<String>,
}

impl Vocabulary {
    /// Builds a vocabulary from canonical display names and blocked words.
    ///
    /// Keys are the lowercased canonical names. Re-registering a key keeps its
    /// original position and takes the latest display name.
    pub fn new<T, B>(terms: T, blocked: B) -> Result<Self, regex::Error>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let mut map = IndexMap::new();
        for term in terms {
            let canonical = term.as_ref().trim();
            if canonical.is_empty() {
                continue;
            }
            map.insert(canonical.to_lowercase(), canonical.to_string());
        }

        let mut boundary_patterns = HashMap::new();
        for key in map.keys() {
            if strategy_for(key) == MatchStrategy::WordBoundary {
                boundary_patterns.insert(key.clone(), boundary_regex(key)?);
            }
        }

        let phrases = map
            .keys()
            .filter(|k| k.contains(' '))
            .map(|k| match boundary_patterns.get(k) {
                Some(pattern) => Ok(PhraseKey {
                    key: k.clone(),
                    pattern: pattern.clone(),
                }),
                None => PhraseKey::new(k),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let blocked = blocked
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();

        Ok(Self {
            terms: map,
            boundary_patterns,
            phrases,
            blocked,
        })
    }

    /// The built-in dictionary of languages, frameworks, databases, platforms,
    /// tooling, protocols and engineering practices.
    pub fn builtin() -> Result<Self, regex::Error> {
        Self::new(
            SKILL_GROUPS.iter().flat_map(|(_, skills)| skills.iter()),
            BLOCKED_WORDS,
        )
    }

    /// Case-insensitive lookup of a token or phrase. Returns the canonical name.
    pub fn lookup(&self, token_or_phrase: &str) -> Option<&str> {
        self.terms
            .get(fold_case(token_or_phrase).as_ref())
            .map(String::as_str)
    }

    pub fn is_blocked(&self, token: &str) -> bool {
        self.blocked.contains(fold_case(token).as_ref())
    }

    /// Precompiled whole-word pattern for a lowercase dictionary key, if it has one.
    pub(crate) fn boundary_pattern(&self, lower_term: &str) -> Option<&Regex> {
        self.boundary_patterns.get(lower_term)
    }

    /// Multi-word keys in declaration order.
    pub fn multi_word_keys(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(|p| p.key.as_str())
    }

    /// Multi-word keys with their boundary patterns, in declaration order.
    pub(crate) fn phrases(&self) -> &[PhraseKey] {
        &self.phrases
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.terms.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms per built-in category, for startup logging.
    pub fn builtin_category_sizes() -> HashMap<&'static str, usize> {
        SKILL_GROUPS
            .iter()
            .map(|(category, skills)| (*category, skills.len()))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in data
// ────────────────────────────────────────────────────────────────────────────

const SKILL_GROUPS: &[(&str, &[&str])] = &[
    ("languages", LANGUAGES),
    ("frameworks", FRAMEWORKS),
    ("databases", DATABASES),
    ("cloud", CLOUD),
    ("devops", DEVOPS),
    ("protocols", PROTOCOLS),
    ("practices", PRACTICES),
    ("project_management", PROJECT_MANAGEMENT),
];

const LANGUAGES: &[&str] = &[
    "Java", "JavaScript", "TypeScript", "Python", "C#", "C++", "Ruby", "Go", "Golang", "Swift",
    "Kotlin", "PHP", "Rust", "SQL", "HTML", "CSS", "SASS", "LESS", "R", "Scala", "Dart",
    "MATLAB", "Perl", "Haskell",
];

const FRAMEWORKS: &[&str] = &[
    "Spring",
    "Spring Boot",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Laravel",
    "Rails",
    "ASP.NET",
    "dotNet",
    "Spring MVC",
    "Spring Security",
    "Next.js",
    "Nuxt",
    "Svelte",
    "jQuery",
    "Bootstrap",
    "Tailwind",
    "MUI",
    "Material UI",
    "Redux",
    "RxJS",
    "Hibernate",
    "JPA",
    "MyBatis",
    "JUnit",
    "Mockito",
    "Selenium",
    "Jest",
    "Cypress",
    "Flutter",
    "React Native",
    "TensorFlow",
    "PyTorch",
    "Pandas",
    "NumPy",
    "Spark",
];

const DATABASES: &[&str] = &[
    "MySQL",
    "PostgreSQL",
    "Postgres",
    "MongoDB",
    "Redis",
    "Oracle",
    "SQL Server",
    "SQLite",
    "Cassandra",
    "DynamoDB",
    "MariaDB",
    "Elasticsearch",
    "Neo4j",
    "Firebase",
    "CouchDB",
];

const CLOUD: &[&str] = &[
    "AWS",
    "Azure",
    "GCP",
    "Google Cloud",
    "Heroku",
    "Netlify",
    "Vercel",
    "DigitalOcean",
    "AWS S3",
    "AWS EC2",
    "AWS Lambda",
    "Amplify",
    "Cloudfront",
    "Route53",
];

const DEVOPS: &[&str] = &[
    "Docker",
    "Kubernetes",
    "K8s",
    "Jenkins",
    "Git",
    "GitHub",
    "GitLab",
    "Bitbucket",
    "Ansible",
    "Terraform",
    "CI/CD",
    "CircleCI",
    "Travis CI",
    "Maven",
    "Gradle",
    "npm",
    "Yarn",
    "pip",
    "Prometheus",
    "Grafana",
    "Splunk",
    "Linux",
    "Ubuntu",
    "Debian",
    "CentOS",
    "Nginx",
    "Apache",
    "RabbitMQ",
    "Kafka",
    "ActiveMQ",
];

const PROTOCOLS: &[&str] = &[
    "REST",
    "RESTful",
    "RESTful APIs",
    "SOAP",
    "GraphQL",
    "gRPC",
    "JSON",
    "XML",
    "HTTP",
    "HTTPS",
    "OAuth",
    "JWT",
    "WebSocket",
    "Web API",
];

const PRACTICES: &[&str] = &[
    "Algorithms",
    "Data Structures",
    "Backend",
    "Frontend",
    "Full Stack",
    "Microservices",
    "Unit Testing",
    "Integration Testing",
    "ORM",
    "MVC",
    "API",
    "UI",
    "UX",
    "SDLC",
    "Object-Oriented Programming",
    "OOP",
    "Design Patterns",
    "Agile",
    "Scrum",
    "Kanban",
    "TDD",
    "BDD",
];

const PROJECT_MANAGEMENT: &[&str] = &["Jira", "Confluence", "Trello", "Asana"];

/// Generic job-posting vocabulary that must never surface as a skill.
const BLOCKED_WORDS: &[&str] = &[
    "software", "based", "using", "are", "computer", "experience", "programming",
    "development", "solutions", "technologies", "technology", "technical", "final", "your",
    "years", "would", "bit", "authorized", "building", "analyzing", "various", "quality",
    "professional", "highly", "ability", "team", "work", "level", "strong", "excellent", "role",
    "summary", "hands", "seeking", "this", "that", "and", "the", "for", "with", "about",
    "against", "from", "at", "his", "her", "must", "have", "preferred", "requirements",
    "responsibilities", "candidate", "position", "company", "applications", "knowledge",
    "skills", "tools", "expert", "lead", "senior", "junior", "mid", "basic",
];
