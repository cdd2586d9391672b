//! Fixed text of the sequence: explosion window kinds and phase messages.

/// Question shown when the sequence waits for the user.
pub const INTERACTIVE_PROMPT: &str = "Enter target file to access:";

/// Prompt tag of the main window.
pub const MAIN_TAG: &str = "main";

/// Phrases the main terminal prints while the explosion windows storm.
pub const MAIN_PHRASES: &[&str] = &[
    "xiaoOS v2.1 online...",
    "Matrix protocol activated...",
    "Neural network initialized...",
    "Quantum encryption loaded...",
    "Target locked: DAVID_XIAO...",
];

/// Second line of the explosion preamble.
pub const PROTOCOL_LINE: &str = "Initiating matrix protocol...";

/// Lines appended to the main window once every storm finished.
pub const FINAL_MESSAGES: [&str; 2] = ["MATRIX PROTOCOL COMPLETE", "TARGET DOSSIER READY"];

/// Prompt tag of the final messages.
pub const FINAL_TAG: &str = "final";

/// First line of the explosion preamble.
pub fn access_line(target: &str) -> String {
    format!("Accessing target file: {target}...")
}

/// Redirect notice, naming the dossier built from the target file.
pub fn redirect_line(target: &str) -> String {
    let stem = target.split('.').next().unwrap_or(target);
    format!("Matrix protocol complete. Accessing {stem}.dossier...")
}

/// Title of the main window.
pub fn main_title(hostname: &str, version: &str) -> String {
    format!("{hostname} {version} - Main Terminal")
}

/// The themed explosion windows.
///
/// Each kind carries its own title, prompt tag and phrase pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplosionKind {
    /// Biometric tracking
    Surveillance,
    /// Network intrusion
    Network,
    /// Privilege escalation
    Security,
    /// File extraction
    Data,
    /// Behavioral analysis
    Analysis,
    /// Credential forging
    Access,
    /// Cipher breaking
    Crypto,
    /// Resource monitoring
    Monitor,
}

impl ExplosionKind {
    /// Every kind, in spawn order.
    pub const ALL: [ExplosionKind; 8] = [
        ExplosionKind::Surveillance,
        ExplosionKind::Network,
        ExplosionKind::Security,
        ExplosionKind::Data,
        ExplosionKind::Analysis,
        ExplosionKind::Access,
        ExplosionKind::Crypto,
        ExplosionKind::Monitor,
    ];

    /// Kind of the `index`th spawned window; wraps after eight.
    pub fn cycle(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Window title.
    pub fn title(self) -> &'static str {
        match self {
            ExplosionKind::Surveillance => "Surveillance Matrix",
            ExplosionKind::Network => "Network Scanner",
            ExplosionKind::Security => "Security Breach",
            ExplosionKind::Data => "Data Extraction",
            ExplosionKind::Analysis => "Target Analysis",
            ExplosionKind::Access => "Access Control",
            ExplosionKind::Crypto => "Crypto Decoder",
            ExplosionKind::Monitor => "System Monitor",
        }
    }

    /// Prompt tag, as in `root@host-<tag>:~$`.
    pub fn tag(self) -> &'static str {
        match self {
            ExplosionKind::Surveillance => "surveillance",
            ExplosionKind::Network => "network",
            ExplosionKind::Security => "security",
            ExplosionKind::Data => "data",
            ExplosionKind::Analysis => "analysis",
            ExplosionKind::Access => "access",
            ExplosionKind::Crypto => "crypto",
            ExplosionKind::Monitor => "monitor",
        }
    }

    /// Phrases this window prints between glyph lines.
    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            ExplosionKind::Surveillance => &[
                "Scanning biometric signatures...",
                "Processing facial recognition data...",
                "Analyzing movement patterns...",
                "Tracking digital footprint...",
                "Monitoring communication channels...",
                "Cross-referencing databases...",
                "Building psychological profile...",
            ],
            ExplosionKind::Network => &[
                "Penetrating firewall defenses...",
                "Bypassing security protocols...",
                "Establishing backdoor connections...",
                "Intercepting data packets...",
                "Mapping network topology...",
                "Exploiting zero-day vulnerabilities...",
                "Injecting malicious payloads...",
            ],
            ExplosionKind::Security => &[
                "Exploiting buffer overflow...",
                "Escalating privileges...",
                "Bypassing authentication...",
                "Accessing restricted areas...",
                "Injecting SQL payloads...",
                "Brute forcing credentials...",
                "Social engineering attack...",
            ],
            ExplosionKind::Data => &[
                "Extracting personal files...",
                "Decrypting sensitive data...",
                "Downloading contact lists...",
                "Scanning social media profiles...",
                "Compiling comprehensive dossier...",
                "Analyzing behavioral patterns...",
                "Cross-referencing multiple sources...",
            ],
            ExplosionKind::Analysis => &[
                "Running behavioral analysis...",
                "Building psychological profile...",
                "Identifying key connections...",
                "Assessing threat level...",
                "Predicting future actions...",
                "Analyzing communication patterns...",
                "Mapping social networks...",
            ],
            ExplosionKind::Access => &[
                "Overriding access controls...",
                "Generating fake credentials...",
                "Bypassing security checks...",
                "Granting elevated permissions...",
                "Establishing persistent access...",
                "Creating backdoor accounts...",
                "Modifying system logs...",
            ],
            ExplosionKind::Crypto => &[
                "Breaking encryption algorithms...",
                "Decrypting secure communications...",
                "Cracking password hashes...",
                "Analyzing cryptographic keys...",
                "Exploiting weak ciphers...",
                "Reverse engineering protocols...",
                "Bypassing digital signatures...",
            ],
            ExplosionKind::Monitor => &[
                "Monitoring system resources...",
                "Tracking network traffic...",
                "Analyzing system logs...",
                "Detecting security breaches...",
                "Monitoring user activities...",
                "Tracking file access patterns...",
                "Analyzing system performance...",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(ExplosionKind::cycle(0), ExplosionKind::Surveillance);
        assert_eq!(ExplosionKind::cycle(7), ExplosionKind::Monitor);
        assert_eq!(ExplosionKind::cycle(8), ExplosionKind::Surveillance);
        assert_eq!(ExplosionKind::cycle(10), ExplosionKind::Security);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let titles: HashSet<_> = ExplosionKind::ALL.iter().map(|k| k.title()).collect();
        let tags: HashSet<_> = ExplosionKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(titles.len(), 8);
        assert_eq!(tags.len(), 8);
        assert!(ExplosionKind::ALL.iter().all(|k| !k.phrases().is_empty()));
        assert!(!tags.contains(MAIN_TAG));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            access_line("DAVID_XIAO.portfolio"),
            "Accessing target file: DAVID_XIAO.portfolio..."
        );
        assert_eq!(
            redirect_line("DAVID_XIAO.portfolio"),
            "Matrix protocol complete. Accessing DAVID_XIAO.dossier..."
        );
        assert_eq!(redirect_line("plain"), "Matrix protocol complete. Accessing plain.dossier...");
        assert_eq!(main_title("xiaoOS", "v2.1"), "xiaoOS v2.1 - Main Terminal");
    }
}
