//! Naming rules shared by the generator and the file manipulators
//!
//! Everything here is a pure function of its inputs. The outputs end up in
//! generated source, routing keys and service ids, so the exact spelling matters:
//! re-running the generator must land on the same keys as the previous run.

use convert_case::{Case, Casing};
use regex::Regex;
use std::sync::LazyLock;

/// Pluralization rules, first match wins
const PLURAL_RULES: &[(&str, &str)] = &[
    (r"(?i)(s)tatus$", "${1}tatuses"),
    (r"(?i)(quiz)$", "${1}zes"),
    (r"(?i)^(ox)$", "${1}en"),
    (r"(?i)([ml])ouse$", "${1}ice"),
    (r"(?i)(matr|vert|ind)(ix|ex)$", "${1}ices"),
    (r"(?i)(x|ch|ss|sh)$", "${1}es"),
    (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
    (r"(?i)(hive|gulf)$", "${1}s"),
    (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
    (r"(?i)sis$", "ses"),
    (r"(?i)([ti])um$", "${1}a"),
    (r"(?i)(p)erson$", "${1}eople"),
    (r"(?i)(m)an$", "${1}en"),
    (r"(?i)(c)hild$", "${1}hildren"),
    (r"(?i)(f)oot$", "${1}eet"),
    (r"(?i)(buffal|her|potat|tomat|volcan)o$", "${1}oes"),
    (
        r"(?i)(alumn|bacill|cact|foc|fung|nucle|radi|stimul|syllab|termin|vir)us$",
        "${1}i",
    ),
    (r"(?i)us$", "uses"),
    (r"(?i)(alias)$", "${1}es"),
    (r"(?i)(analys|ax|cris|test|thes)is$", "${1}es"),
    (r"s$", "s"),
    (r"^$", ""),
    (r"$", "s"),
];

const IRREGULAR: &[(&str, &str)] = &[
    ("atlas", "atlases"),
    ("axe", "axes"),
    ("beef", "beefs"),
    ("brother", "brothers"),
    ("cafe", "cafes"),
    ("child", "children"),
    ("cookie", "cookies"),
    ("corpus", "corpuses"),
    ("cow", "cows"),
    ("criterion", "criteria"),
    ("curriculum", "curricula"),
    ("demo", "demos"),
    ("domino", "dominoes"),
    ("echo", "echoes"),
    ("foot", "feet"),
    ("fungus", "fungi"),
    ("genie", "genies"),
    ("genus", "genera"),
    ("hoof", "hoofs"),
    ("human", "humans"),
    ("iris", "irises"),
    ("leaf", "leaves"),
    ("loaf", "loaves"),
    ("man", "men"),
    ("medium", "media"),
    ("memorandum", "memoranda"),
    ("money", "monies"),
    ("mongoose", "mongooses"),
    ("motto", "mottoes"),
    ("move", "moves"),
    ("niche", "niches"),
    ("nucleus", "nuclei"),
    ("octopus", "octopuses"),
    ("opus", "opuses"),
    ("ox", "oxen"),
    ("person", "people"),
    ("plateau", "plateaux"),
    ("sex", "sexes"),
    ("soliloquy", "soliloquies"),
    ("syllabus", "syllabi"),
    ("thief", "thieves"),
    ("tooth", "teeth"),
    ("tornado", "tornadoes"),
    ("turf", "turfs"),
    ("wave", "waves"),
];

const UNINFLECTED: &[&str] = &[
    ".*[nrlm]ese",
    ".*deer",
    ".*fish",
    ".*measles",
    ".*ois",
    ".*pox",
    ".*sheep",
    ".*?media",
    "people",
    "audio",
    "bison",
    "chassis",
    "cod",
    "corps",
    "data",
    "debris",
    "equipment",
    "evidence",
    "feedback",
    "furniture",
    "gold",
    "headquarters",
    "information",
    "knowledge",
    "metadata",
    "moose",
    "news",
    "nexus",
    "offspring",
    "police",
    "rice",
    "salmon",
    "series",
    "species",
    "staff",
    "traffic",
    "trout",
    "tuna",
    "us",
    "wheat",
];

static PLURAL_REGEXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PLURAL_RULES
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("pluralization rule is a valid regex"),
                *replacement,
            )
        })
        .collect()
});

static IRREGULAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<&str> = IRREGULAR.iter().map(|(singular, _)| *singular).collect();
    Regex::new(&format!(r"(?i)^(.*)\b({})$", words.join("|")))
        .expect("irregular word list is a valid regex")
});

static UNINFLECTED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?:{})$", UNINFLECTED.join("|")))
        .expect("uninflected word list is a valid regex")
});

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid regex"));

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid regex"));

/// Return the plural form of an English word (`post` -> `posts`, `category` -> `categories`)
pub fn pluralize(word: &str) -> String {
    if let Some(caps) = IRREGULAR_REGEX.captures(word) {
        let head = &caps[1];
        let matched = &caps[2];
        let plural = IRREGULAR
            .iter()
            .find(|(singular, _)| singular.eq_ignore_ascii_case(matched))
            .map(|(_, plural)| *plural)
            .unwrap_or(matched);
        // Keep the caller's casing of the first letter
        let first: String = matched.chars().take(1).collect();
        let rest: String = plural.chars().skip(1).collect();
        return format!("{}{}{}", head, first, rest);
    }

    if UNINFLECTED_REGEX.is_match(word) {
        return word.to_string();
    }

    for (regex, replacement) in PLURAL_REGEXES.iter() {
        if regex.is_match(word) {
            return regex.replace(word, *replacement).into_owned();
        }
    }

    word.to_string()
}

/// Symfony's `Container::underscore`: `AcmeBlog` -> `acme_blog`, `Foo_Bar` -> `foo.bar`
pub fn underscore(id: &str) -> String {
    let dotted = id.replace('_', ".");
    let step = ACRONYM_BOUNDARY.replace_all(&dotted, "${1}_${2}");
    CAMEL_BOUNDARY
        .replace_all(&step, "${1}_${2}")
        .to_lowercase()
}

/// `AcmeBlogBundle` -> `AcmeBlog`
pub fn strip_bundle_suffix(bundle: &str) -> &str {
    bundle.strip_suffix("Bundle").unwrap_or(bundle)
}

/// `Post` -> `posts`
pub fn route_prefix(simple_name: &str) -> String {
    pluralize(&simple_name.to_lowercase())
}

/// `noinc` + `posts` -> `noinc_posts_`
pub fn route_name_prefix(org_prefix: &str, route_prefix: &str) -> String {
    format!("{}_{}_", org_prefix, route_prefix)
}

/// Normalise a user supplied prefix (`posts`, `/posts`, ``) to a mount prefix (`/posts`, `/`)
pub fn mount_prefix(prefix: &str) -> String {
    format!("/{}", prefix.trim().trim_matches('/'))
}

/// Route prefix used when the caller did not provide one: `Blog\Post` -> `blog_post`
pub fn default_route_prefix(entity: &str) -> String {
    entity.replace(['\\', '/'], "_").to_lowercase()
}

/// Key of the routing group in the application routing document.
///
/// `BlogBundle`, `/posts`, `Post` -> `blog_post_posts`
pub fn routing_group_key(bundle: &str, prefix: &str, entity: &str) -> String {
    let mut key = format!(
        "{}_{}",
        underscore(strip_bundle_suffix(bundle)),
        underscore(entity).replace('\\', "_")
    );
    if prefix != "/" {
        let trimmed = prefix.strip_prefix('/').unwrap_or(prefix);
        key.push('_');
        key.push_str(&trimmed.replace('/', "_"));
    }
    key
}

/// Key of the annotation import in the application routing document: `AcmeBlogBundle` -> `acmeblog`
pub fn annotation_route_key(bundle: &str) -> String {
    bundle.replace("Bundle", "").to_lowercase()
}

/// Id of the generated handler service: `BlogBundle`, `Post` -> `blog.post.handler`
pub fn service_id(bundle: &str, entity: &str) -> String {
    let bundle = bundle.to_lowercase();
    let bundle = bundle.strip_suffix("bundle").unwrap_or(&bundle);
    let entity = entity.to_lowercase().replace('\\', ".");
    format!("{}.{}.handler", underscore(bundle), underscore(&entity))
}

/// Block prefix of the generated form type:
/// `Acme\BlogBundle`, `Blog\Post` -> `acme_blogbundle_blog_posttype`
pub fn form_type_name(bundle_namespace: &str, entity: &str) -> String {
    let mut parts: Vec<&str> = entity.split('\\').collect();
    let class = parts.pop().unwrap_or(entity);
    let mut name = bundle_namespace.replace('\\', "_");
    if !parts.is_empty() {
        name.push('_');
        name.push_str(&parts.join("_"));
    }
    format!("{}_{}Type", name, class).to_lowercase()
}

/// `no-authentication` -> `NoAuthentication`
pub fn studly(value: &str) -> String {
    value.to_case(Case::Pascal)
}
