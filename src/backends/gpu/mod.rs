//! GPU kernel using wgpu (Vulkan/Metal/DX12/GL)
//!
//! The battery is uploaded as one storage buffer, a WGSL compute shader
//! writes every result bit into a 32×N `Rgba8Unorm` storage texture, and the
//! texture is copied to a mappable buffer and read back in one blocking round
//! trip. The 8-bit storage is what the codec's 0.5 threshold absorbs.
//!
//! # Architecture
//!
//! - Device initialization is lazy (first evaluate or runtime query)
//! - Compute shader written in WGSL
//! - Asynchronous wgpu calls driven by pollster

#[cfg(feature = "gpu")]
mod device;

#[cfg(feature = "gpu")]
mod shaders;

#[cfg(feature = "gpu")]
pub mod runtime;

#[cfg(feature = "gpu")]
pub use device::GpuDevice;

#[cfg(feature = "gpu")]
use super::SinKernel;
#[cfg(feature = "gpu")]
use crate::codec::Bitplane;
#[cfg(feature = "gpu")]
use crate::config::PowerPreference;
#[cfg(feature = "gpu")]
use crate::error::{ProbeError, Result};

/// Vendor name for a PCI vendor ID, as reported by the adapter
///
/// Vendor IDs from PCI-SIG registry:
/// - NVIDIA: 0x10de
/// - AMD: 0x1002
/// - Intel: 0x8086
/// - Apple: 0x106b
#[must_use]
pub const fn pci_vendor_name(id: u32) -> &'static str {
    match id {
        0x10de => "NVIDIA",
        0x1002 => "AMD",
        0x8086 => "Intel",
        0x106b => "Apple",
        _ => "Unknown",
    }
}

/// wgpu `sin()` kernel
#[cfg(feature = "gpu")]
pub struct GpuKernel {
    power: PowerPreference,
    device: Option<GpuDevice>,
}

#[cfg(feature = "gpu")]
impl GpuKernel {
    /// Create a GPU kernel; the device is requested on first use
    pub fn new(power: PowerPreference) -> Self {
        Self {
            power,
            device: None,
        }
    }

    /// Check if GPU is available
    pub fn is_available() -> bool {
        GpuDevice::is_available()
    }

    /// Initialize GPU device (lazy)
    fn ensure_device(&mut self) -> Result<&GpuDevice> {
        if self.device.is_none() {
            self.device = Some(GpuDevice::new(self.power)?);
        }
        self.device.as_ref().ok_or(ProbeError::NoAdapter)
    }
}

#[cfg(feature = "gpu")]
impl SinKernel for GpuKernel {
    fn name(&self) -> &str {
        "wgpu"
    }

    fn runtime_info(&mut self) -> Result<String> {
        let info = &self.ensure_device()?.info;
        Ok(format!(
            "Platform={}-{}, API={:?}, Name=\"{}\", Vendor=\"{}\" (0x{:04x}), Driver=\"{}\", DriverInfo=\"{}\"",
            std::env::consts::OS,
            std::env::consts::ARCH,
            info.backend,
            info.name,
            pci_vendor_name(info.vendor),
            info.vendor,
            info.driver,
            info.driver_info
        ))
    }

    fn evaluate(&mut self, inputs: &[f32]) -> Result<Bitplane> {
        self.ensure_device()?.sin_bitplane(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pci_vendor_name() {
        assert_eq!(pci_vendor_name(0x10de), "NVIDIA");
        assert_eq!(pci_vendor_name(0x1002), "AMD");
        assert_eq!(pci_vendor_name(0x8086), "Intel");
        assert_eq!(pci_vendor_name(0x106b), "Apple");
        assert_eq!(pci_vendor_name(0x5143), "Unknown");
    }

    #[cfg(feature = "gpu")]
    #[test]
    fn test_gpu_kernel_battery() {
        use crate::battery::battery_values;

        if !GpuKernel::is_available() {
            eprintln!("GPU not available, skipping test");
            return;
        }

        let mut kernel = GpuKernel::new(PowerPreference::HighPerformance);
        let plane = kernel.evaluate(&battery_values()).unwrap();
        assert_eq!(plane.height(), 9);
        let decoded = plane.decode_rows().unwrap();
        // sin(+0) is +0 on every vendor
        assert_eq!(decoded[4], 0x0000_0000);
    }

    #[cfg(feature = "gpu")]
    #[test]
    fn test_gpu_kernel_rejects_empty() {
        if !GpuKernel::is_available() {
            eprintln!("GPU not available, skipping test");
            return;
        }

        let mut kernel = GpuKernel::new(PowerPreference::HighPerformance);
        assert!(matches!(kernel.evaluate(&[]), Err(ProbeError::InvalidInput(_))));
    }
}
