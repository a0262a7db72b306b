//! Keyword scoring of a document against a table of technology domains.

use serde::Deserialize;
use tracing::debug;

use super::{
    matcher::WordPattern,
    policy::{ClassificationPolicy, PolicyVersion},
};
use crate::error::Result;

/// One classification target: a subcategory id and the words that vote for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Domain {
    pub name: String,
    /// Minimum score before the language offset is applied.
    pub threshold: usize,
    pub keywords: Vec<String>,
}

impl Domain {
    pub fn new(name: &str, threshold: usize, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            threshold,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// Ordered domain table. Order matters: it decides ties and first-match
/// winners.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainTable {
    pub domains: Vec<Domain>,
}

impl DomainTable {
    pub fn new(domains: Vec<Domain>) -> Self {
        Self { domains }
    }

    /// The table the knowledge base is classified with.
    pub fn builtin() -> Self {
        Self::new(vec![
            Domain::new("on-device-ai", 2, &[
                "npu", "quantization", "tflite", "tensorrt", "edge-ai",
                "onnx", "onnxruntime", "mobile-ml", "coreml", "openvino",
                "snpe", "qnn", "hexagon", "int8", "int4", "ggml", "gguf",
                "llama.cpp", "mlc-llm", "executorch", "litert", "nnapi",
                "mediapipe", "pruning", "distillation", "on-device",
                "edge-tpu", "coral", "jetson", "tvm",
            ]),
            Domain::new("virtualization-cloud", 2, &[
                "kvm", "qemu", "hypervisor", "virtio", "vhost", "container",
                "containers", "docker", "kubernetes", "k8s", "xen", "vmware",
                "vmm", "firecracker", "crosvm", "cloud-hypervisor",
                "overlay-network", "helm", "serverless", "containerd", "runc",
                "cgroup", "cgroups", "namespaces", "vfio", "sr-iov", "iommu",
                "ept", "vmexit", "live-migration", "aws", "gcp", "azure",
                "terraform", "istio",
            ]),
            Domain::new("deep-learning", 3, &[
                "pytorch", "tensorflow", "jax", "keras", "backpropagation",
                "transformer", "transformers", "attention", "llm", "llms",
                "cnn", "rnn", "lstm", "gan", "diffusion", "gradient-descent",
                "optimizer", "neural-network", "embedding", "fine-tuning",
                "lora", "rlhf", "tokenizer", "dropout", "batchnorm", "resnet",
                "bert", "gpt", "vit", "loss-function", "softmax",
            ]),
            Domain::new("game-dev-graphics", 2, &[
                "unity", "unreal", "godot", "opengl", "vulkan", "directx",
                "webgpu", "shader", "shaders", "hlsl", "glsl", "spir-v",
                "ray-tracing", "rasterization", "rendering-pipeline",
                "physics-engine", "gpu-driven", "framebuffer", "swapchain",
                "pbr", "deferred-rendering", "game-engine", "mipmap",
                "vertex-buffer",
            ]),
            Domain::new("high-perf-computing", 2, &[
                "simd", "avx", "avx2", "avx-512", "neon", "sve", "cuda",
                "opencl", "hip", "rocm", "sycl", "openmp", "mpi", "gpgpu",
                "fpga", "parallel-programming", "lock-free", "wait-free",
                "atomic", "atomics", "memory-barrier", "cache-line",
                "false-sharing", "numa", "vectorization", "prefetch",
                "roofline", "warp", "kernel-fusion",
            ]),
            Domain::new("system-kernel-network", 2, &[
                "ebpf", "bpf", "xdp", "bbr", "tcp-ip", "tcp", "udp", "quic",
                "socketmap", "netfilter", "iptables", "nftables", "syscall",
                "syscalls", "kernel-module", "interrupt-handler", "zero-copy",
                "io_uring", "epoll", "dpdk", "rdma", "napi", "sk_buff",
                "mmap", "page-cache", "linux-kernel", "kprobe", "tracepoint",
                "risc-v", "congestion-control",
            ]),
            Domain::new("cyber-security", 2, &[
                "malware", "exploit", "exploitation", "cryptography",
                "overflow", "buffer-overflow", "reverse-engineering", "ctf",
                "zero-day", "cve", "tls", "pki", "x509", "penetration",
                "pentest", "fuzzing", "fuzzer", "sanitizer", "rop",
                "shellcode", "xss", "csrf", "sql-injection", "aslr",
                "side-channel", "spectre", "meltdown", "ransomware",
                "phishing", "privilege-escalation",
            ]),
            Domain::new("data-engineering", 3, &[
                "spark", "hadoop", "hdfs", "kafka", "flink", "airflow", "dbt",
                "etl", "elt", "data-lake", "lakehouse", "warehouse",
                "snowflake", "bigquery", "nosql", "postgresql", "postgres",
                "mysql", "redis", "elasticsearch", "mongodb", "cassandra",
                "clickhouse", "parquet", "iceberg", "delta-lake", "duckdb",
                "olap", "cdc", "debezium",
            ]),
            Domain::new("web-app-dev", 3, &[
                "react", "vue", "angular", "svelte", "nextjs", "next.js",
                "nuxt", "typescript", "javascript", "wasm", "webassembly",
                "tailwind", "webpack", "vite", "spring", "django", "flask",
                "fastapi", "express", "nodejs", "node.js", "graphql", "grpc",
                "rest-api", "frontend", "backend", "html", "css", "dom",
                "ssr",
            ]),
        ])
    }
}

impl Default for DomainTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Score of one domain for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScore {
    pub domain: String,
    pub score: usize,
    /// Threshold after the language offset.
    pub threshold: usize,
}

impl DomainScore {
    pub fn qualifies(&self) -> bool {
        self.score >= self.threshold
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub subcategory: String,
    pub primarily_english: bool,
    pub scores: Vec<DomainScore>,
}

#[derive(Debug)]
struct CompiledDomain {
    name: String,
    threshold: usize,
    patterns: Vec<WordPattern>,
}

/// Picks a subcategory for a document from its title and body.
#[derive(Debug)]
pub struct SubcategoryClassifier {
    domains: Vec<CompiledDomain>,
    policy: ClassificationPolicy,
}

impl SubcategoryClassifier {
    pub fn new(table: &DomainTable, policy: ClassificationPolicy) -> Result<Self> {
        let domains = table
            .domains
            .iter()
            .map(|d| {
                let patterns = d
                    .keywords
                    .iter()
                    .map(|k| WordPattern::new(k))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledDomain {
                    name: d.name.clone(),
                    threshold: d.threshold,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { domains, policy })
    }

    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    /// Score every domain against `title` + `body`.
    pub fn score(&self, title: &str, body: &str) -> (bool, Vec<DomainScore>) {
        let text = format!("{title} {body}").to_lowercase();
        let english = self.policy.language.is_primarily_english(&text);
        let offset = if english { self.policy.english_offset } else { 0 };

        let scores = self
            .domains
            .iter()
            .map(|d| DomainScore {
                domain: d.name.clone(),
                score: d.patterns.iter().map(|p| p.count(&text)).sum(),
                threshold: d.threshold + offset,
            })
            .collect();
        (english, scores)
    }

    pub fn classify(&self, title: &str, body: &str) -> Classification {
        let (primarily_english, scores) = self.score(title, body);

        let winner = match self.policy.version {
            PolicyVersion::Scored => {
                let mut best: Option<&DomainScore> = None;
                for candidate in scores.iter().filter(|s| s.qualifies()) {
                    let replace = match best {
                        None => true,
                        Some(b) => {
                            self.policy.tie_break.replaces(candidate.score, b.score)
                        }
                    };
                    if replace {
                        best = Some(candidate);
                    }
                }
                best
            }
            PolicyVersion::FirstMatch => scores.iter().find(|s| s.score > 0),
        };

        let subcategory = winner
            .map(|s| s.domain.clone())
            .unwrap_or_else(|| self.policy.fallback_subcategory.clone());

        debug!(
            subcategory = %subcategory,
            primarily_english,
            scores = ?scores
                .iter()
                .filter(|s| s.score > 0)
                .map(|s| (s.domain.as_str(), s.score, s.threshold))
                .collect::<Vec<_>>(),
            "classified document"
        );

        Classification {
            subcategory,
            primarily_english,
            scores,
        }
    }
}
