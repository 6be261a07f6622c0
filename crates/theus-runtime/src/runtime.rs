use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::Level;
use theus_support::compat::{try_read_region, try_write_region};
use theus_support::{BoundaryError, INVALID_HANDLE};
use wasmtime::{
    Caller, Engine, Instance, Linker, Memory, Module, Store, StoreLimits, StoreLimitsBuilder,
    TypedFunc,
};

use crate::config::{ExportNames, RuntimeConfig};

/// Log target used for lines forwarded by the module.
pub const GUEST_LOG_TARGET: &str = "theus_guest";

pub struct State {
    limits: StoreLimits,
    guest_log_lines: u64,
}

impl State {
    pub fn new(max_memory_bytes: usize) -> Self {
        State {
            limits: StoreLimitsBuilder::new()
                .memory_size(max_memory_bytes)
                .instances(1)
                .build(),
            guest_log_lines: 0,
        }
    }
}

/// One instantiated module and the typed exports of the calling convention.
pub struct ModuleRuntime {
    store: Store<State>,
    memory: Memory,
    exports: ExportNames,
    create: TypedFunc<(), u32>,
    ptr: TypedFunc<u32, u32>,
    len: TypedFunc<u32, u32>,
    reserve: TypedFunc<(u32, u32), u32>,
    destroy: TypedFunc<u32, ()>,
}

fn guest_level(level: u32) -> Level {
    match level {
        0 | 1 => Level::Error,
        2 => Level::Warn,
        3 => Level::Info,
        4 => Level::Debug,
        _ => Level::Trace,
    }
}

impl ModuleRuntime {
    pub fn load(path: impl AsRef<Path>, config: RuntimeConfig) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read module {}", path.display()))?;
        Self::new(&bytes, config)
    }

    /// Compile and instantiate a module given in binary or text format.
    pub fn new(bytes: &[u8], config: RuntimeConfig) -> Result<Self> {
        let mut engine_config = wasmtime::Config::new();
        if config.fuel.is_some() {
            engine_config.consume_fuel(true);
        }
        let engine = Engine::new(&engine_config)?;
        let module = Module::new(&engine, bytes).context("Failed to compile WASM module")?;

        let mut store = Store::new(&engine, State::new(config.max_memory_bytes));
        store.limiter(|state| &mut state.limits);
        if let Some(fuel) = config.fuel {
            store.set_fuel(fuel).context("Failed to set fuel")?;
        }

        let mut linker = Linker::<State>::new(&engine);
        Self::setup_linker(&mut linker, &config.exports.memory)
            .context("Failed to setup linker")?;
        linker.define_unknown_imports_as_traps(&module)?;

        let instance = linker
            .instantiate(&mut store, &module)
            .context("Failed to instantiate WASM module")?;
        let exports = config.exports;
        let memory = instance
            .get_memory(&mut store, &exports.memory)
            .ok_or_else(|| anyhow!("module does not export memory '{}'", exports.memory))?;

        let create = typed(&instance, &mut store, &exports.create)?;
        let ptr = typed(&instance, &mut store, &exports.ptr)?;
        let len = typed(&instance, &mut store, &exports.len)?;
        let reserve = typed(&instance, &mut store, &exports.reserve)?;
        let destroy = typed(&instance, &mut store, &exports.destroy)?;

        let mut runtime = ModuleRuntime {
            store,
            memory,
            exports,
            create,
            ptr,
            len,
            reserve,
            destroy,
        };
        runtime.init_guest_logging(&instance)?;
        log::info!(
            "loaded module with {} bytes of linear memory",
            runtime.memory_size()
        );
        Ok(runtime)
    }

    fn setup_linker(linker: &mut Linker<State>, memory_name: &str) -> Result<()> {
        let memory_name = memory_name.to_string();
        linker
            .func_wrap(
                "env",
                "__log",
                move |mut caller: Caller<'_, State>, level: u32, ptr: u32, len: u32| {
                    let memory = match caller.get_export(&memory_name) {
                        Some(export) => match export.into_memory() {
                            Some(memory) => memory,
                            None => return,
                        },
                        None => return,
                    };
                    match try_read_region(memory.data(&caller), ptr as usize, len as usize) {
                        Ok(bytes) => {
                            let text = String::from_utf8_lossy(bytes);
                            log::log!(target: GUEST_LOG_TARGET, guest_level(level), "{}", text);
                        }
                        Err(e) => log::warn!("dropping guest log line: {}", e),
                    }
                    caller.data_mut().guest_log_lines += 1;
                },
            )
            .map_err(|e| anyhow!("Failed to wrap __log: {:?}", e))?;
        Ok(())
    }

    // Modules built without host logging do not export the initialiser.
    fn init_guest_logging(&mut self, instance: &Instance) -> Result<()> {
        let Ok(init) = instance.get_typed_func::<u32, ()>(&mut self.store, "theus_init_log")
        else {
            return Ok(());
        };
        let level = log::max_level() as usize as u32;
        init.call(&mut self.store, level)
            .context("Error executing theus_init_log")
    }

    pub fn exports(&self) -> &ExportNames {
        &self.exports
    }

    pub fn memory_size(&self) -> usize {
        self.memory.data_size(&self.store)
    }

    /// Number of `__log` calls the module has made.
    pub fn guest_log_lines(&self) -> u64 {
        self.store.data().guest_log_lines
    }

    /// Fuel left in the store, if metering is enabled.
    pub fn fuel_remaining(&self) -> Option<u64> {
        self.store.get_fuel().ok()
    }

    /// Raw `create` call. `0` means the module could not create an instance.
    pub fn create(&mut self) -> Result<u32> {
        self.create
            .call(&mut self.store, ())
            .with_context(|| format!("Error executing {}", self.exports.create))
    }

    /// Raw pointer getter. `0` means the handle is invalid.
    pub fn ptr(&mut self, handle: u32) -> Result<u32> {
        self.ptr
            .call(&mut self.store, handle)
            .with_context(|| format!("Error executing {}", self.exports.ptr))
    }

    /// Raw length getter. `0` is either empty content or an invalid handle.
    pub fn len(&mut self, handle: u32) -> Result<u32> {
        self.len
            .call(&mut self.store, handle)
            .with_context(|| format!("Error executing {}", self.exports.len))
    }

    /// Raw reserve call. The returned region must be filled before any
    /// other call into the module.
    pub fn reserve(&mut self, handle: u32, len: u32) -> Result<u32> {
        self.reserve
            .call(&mut self.store, (handle, len))
            .with_context(|| format!("Error executing {}", self.exports.reserve))
    }

    pub fn destroy(&mut self, handle: u32) -> Result<()> {
        log::debug!("destroying handle {}", handle);
        self.destroy
            .call(&mut self.store, handle)
            .with_context(|| format!("Error executing {}", self.exports.destroy))
    }

    /// Create an instance, turning the invalid-handle sentinel into an error.
    pub fn instantiate(&mut self) -> Result<u32> {
        let handle = self.create()?;
        if handle == INVALID_HANDLE {
            return Err(anyhow!(
                "{} failed: module out of memory or out of handles",
                self.exports.create
            ));
        }
        log::debug!("created handle {}", handle);
        Ok(handle)
    }

    /// Copy the instance's bytes out of linear memory.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::InvalidHandle`] when the handle does not resolve and
    /// [`BoundaryError::OutOfBounds`] when the module reports a region
    /// outside its memory. Both are recoverable with `downcast_ref`.
    pub fn read(&mut self, handle: u32) -> Result<Vec<u8>> {
        let len = self.len(handle)?;
        let offset = self.ptr(handle)?;
        if offset == 0 {
            return Err(BoundaryError::InvalidHandle(handle).into());
        }
        let bytes = try_read_region(self.memory.data(&self.store), offset as usize, len as usize)?;
        log::debug!("read {} bytes from handle {} at {:#x}", len, handle, offset);
        Ok(bytes.to_vec())
    }

    pub fn read_string(&mut self, handle: u32) -> Result<String> {
        let bytes = self.read(handle)?;
        String::from_utf8(bytes).context("instance content is not valid UTF-8")
    }

    /// Replace the instance's bytes.
    ///
    /// Reserve and copy happen back to back, so the reserved region cannot
    /// be invalidated by another call.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::OutOfMemory`] when the module cannot allocate (the
    /// old content is kept), [`BoundaryError::InvalidHandle`] when the
    /// handle does not resolve.
    pub fn write(&mut self, handle: u32, bytes: &[u8]) -> Result<()> {
        let requested = bytes.len();
        let len = u32::try_from(requested).map_err(|_| BoundaryError::OutOfMemory { requested })?;
        let offset = self.reserve(handle, len)?;
        if offset == 0 {
            // a live instance still reports its old buffer
            let err = if self.ptr(handle)? != 0 {
                BoundaryError::OutOfMemory { requested }
            } else {
                BoundaryError::InvalidHandle(handle)
            };
            return Err(err.into());
        }
        try_write_region(self.memory.data_mut(&mut self.store), offset as usize, bytes)?;
        log::debug!("wrote {} bytes to handle {} at {:#x}", len, handle, offset);
        Ok(())
    }

    pub fn write_str(&mut self, handle: u32, text: &str) -> Result<()> {
        self.write(handle, text.as_bytes())
    }
}

fn typed<Params, Results>(
    instance: &Instance,
    store: &mut Store<State>,
    name: &str,
) -> Result<TypedFunc<Params, Results>>
where
    Params: wasmtime::WasmParams,
    Results: wasmtime::WasmResults,
{
    instance
        .get_typed_func::<Params, Results>(&mut *store, name)
        .with_context(|| format!("Failed to resolve export {}", name))
}
