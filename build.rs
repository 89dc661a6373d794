use std::{
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

const DEFAULT_RELEASE_CHANNEL: &str = "edge";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=INSTALL_VUE_RELEASE_CHANNEL");

    // The release channel is baked in per published build (install-vue@alpha,
    // install-vue@edge, ...). The binary still accepts --channel at runtime.
    let channel = std::env::var("INSTALL_VUE_RELEASE_CHANNEL")
        .ok()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_RELEASE_CHANNEL.to_string());
    println!("cargo:rustc-env=INSTALL_VUE_DEFAULT_CHANNEL={}", channel.trim());

    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output();

    let version = match output {
        Ok(o) if o.status.success() => {
            let git_output = String::from_utf8(o.stdout)
                .unwrap_or_default()
                .trim()
                .to_string();

            // Strip 'v' prefix if present (e.g., "v1.0.0" -> "1.0.0")
            let version = git_output.strip_prefix('v').unwrap_or(&git_output);

            if version.ends_with("-dirty") || version.is_empty() {
                format!("{}-{}", version, timestamp())
            } else {
                version.to_string()
            }
        }
        _ => format!("0.0.0-unknown-{}", timestamp()),
    };

    println!("cargo:rustc-env=INSTALL_VUE_VERSION={}", version);
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}
