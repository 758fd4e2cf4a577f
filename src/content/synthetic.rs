use super::hashtags::default_hashtags;
use super::ContentPackage;

/// Placeholder for slot `index` (0-based) when nothing usable came back.
pub fn package(topic: &str, index: usize) -> ContentPackage {
    ContentPackage {
        title: format!("Video option {} about {}", index + 1, topic),
        description: format!("This is video option {} about {}.", index + 1, topic),
        hashtags: default_hashtags(topic),
    }
}

/// `option_count` placeholders.
pub fn packages(topic: &str, option_count: usize) -> Vec<ContentPackage> {
    (0..option_count).map(|i| package(topic, i)).collect()
}

/// Filler for a slot the model's structured answer did not cover. `position` is 1-based.
pub fn alternative(topic: &str, position: usize) -> ContentPackage {
    ContentPackage {
        title: format!("Alternative Video about {} #{}", topic, position),
        description: format!("This is an alternative video about {}.", topic),
        hashtags: default_hashtags(topic),
    }
}

/// Top up `packages` with placeholders until it holds `option_count` entries.
pub fn fill(packages: &mut Vec<ContentPackage>, topic: &str, option_count: usize) {
    while packages.len() < option_count {
        let index = packages.len();
        packages.push(package(topic, index));
    }
}
