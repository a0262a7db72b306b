use super::matcher::WordPattern;
use crate::error::Result;

/// Most tags a document receives from harvesting.
pub const MAX_HARVESTED_KEYWORDS: usize = 15;

/// Technology terms recognised as tags, in display casing.
pub const TECH_POOL: &[&str] = &[
    "NPU", "KVM", "QEMU", "PyTorch", "TensorFlow", "Vulkan", "OpenGL", "BBR",
    "eBPF", "XDP", "CUDA", "LLM", "RISC-V", "io_uring", "DPDK", "RDMA",
    "Docker", "Kubernetes", "WASM", "Kafka", "Spark", "Redis", "PostgreSQL",
    "React", "TypeScript", "SIMD", "AVX", "ONNX", "TensorRT", "Rust", "Linux",
];

/// Tags a document with the pool terms its text mentions.
#[derive(Debug)]
pub struct KeywordHarvester {
    pool: Vec<WordPattern>,
    limit: usize,
}

impl KeywordHarvester {
    pub fn new(pool: &[&str], limit: usize) -> Result<Self> {
        let pool = pool
            .iter()
            .map(|term| WordPattern::new(term))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pool, limit })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(TECH_POOL, MAX_HARVESTED_KEYWORDS)
    }

    /// Pool terms present in `title` + `body`, in pool order, deduplicated
    /// and capped.
    pub fn harvest(&self, title: &str, body: &str) -> Vec<String> {
        let text = format!("{title} {body}");
        let mut found: Vec<String> = Vec::new();
        for pattern in &self.pool {
            if found.len() >= self.limit {
                break;
            }
            if found.iter().any(|t| t == pattern.term()) {
                continue;
            }
            if pattern.is_match(&text) {
                found.push(pattern.term().to_string());
            }
        }
        found
    }
}
