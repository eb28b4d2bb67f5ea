use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use vp9dsp_dispatch::{
    init_dsp, Capabilities, CpuFlags, DspTable, IntraKernelId, IntraPredFn, KernelProvider, McFn,
    McKernelId,
};

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

unsafe extern "C" fn mc_stub(_: *mut u8, _: isize, _: *const u8, _: isize, _: i32, _: i32, _: i32) {}

unsafe extern "C" fn intra_pred_stub(_: *mut u8, _: isize, _: *const u8, _: *const u8) {}

struct StubKernels;

impl KernelProvider for StubKernels {
    fn mc(&self, _: McKernelId) -> McFn {
        mc_stub
    }

    fn intra_pred(&self, _: IntraKernelId) -> IntraPredFn {
        intra_pred_stub
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("VP9 DSP Initialization");
    let generic = DspTable::new(|_| mc_stub as McFn, |_| intra_pred_stub as IntraPredFn);

    // Representative processors, from no extensions to a 256-bit vector unit with Zba.
    let profiles = [
        ("none", Capabilities::new(CpuFlags::empty(), 0, 64)),
        ("scalar", Capabilities::new(CpuFlags::RV_MISALIGNED | CpuFlags::RVB_ADDR, 0, 64)),
        (
            "rvv128",
            Capabilities::new(
                CpuFlags::RV_MISALIGNED | CpuFlags::RVV_I32 | CpuFlags::RVV_I64,
                128,
                64,
            ),
        ),
        ("rvv256+zba", Capabilities::new(CpuFlags::all(), 256, 64)),
        ("detected", Capabilities::detect()),
    ];

    for (name, caps) in profiles.iter() {
        group.bench_with_input(BenchmarkId::new("init_dsp", name), caps, |b, caps| {
            b.iter(|| {
                let mut table = generic.clone();
                init_dsp(&mut table, black_box(8), false, black_box(caps), &StubKernels);
                table
            });
        });
    }

    // Baseline: the clone alone.
    group.bench_function("clone only", |b| b.iter(|| black_box(&generic).clone()));

    group.finish();
}

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
)))]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
