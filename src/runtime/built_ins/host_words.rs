use std::collections::HashMap;
use std::os::raw::c_void;
use std::sync::Mutex;

use lazy_static::lazy_static;
use libffi::low::{ffi_abi_FFI_DEFAULT_ABI, ffi_cif, types};
use libffi::raw::{ffi_call, ffi_prep_cif, ffi_status_FFI_OK};
use libloading::{Library, Symbol};

use crate::runtime::built_ins::{native, pop_int, pop_string};
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::Status;
use crate::runtime::interpreter::{Interpreter, InterpreterStack};

lazy_static! {
    /// Shared libraries opened by `LOAD-LIBRARY`, keyed by the tag a script chose for them.
    /// Process-wide rather than a field on one interpreter instance: ATLAST's own
    /// `Interpreter` trait carries no FFI context slot (see `built_ins/mod.rs`), and a dynamic
    /// library handle naturally outlives any one script run anyway.
    static ref LIBRARIES: Mutex<HashMap<String, Library>> = Mutex::new(HashMap::new());
}

/// Call an exported C function of the one signature this crate supports: a single `i64` in, a
/// single `i64` out. Uses the standard
/// `ffi_prep_cif`/`ffi_call` sequence, with both `arg_types[0]` and the return type
/// fixed at `types::sint64`.
fn call_i64_function(symbol: *mut c_void, arg: i64) -> i64 {
    unsafe {
        let mut cif: ffi_cif = std::mem::zeroed();
        let mut arg_types = [&raw mut types::sint64];
        let status = ffi_prep_cif(&mut cif, ffi_abi_FFI_DEFAULT_ABI, 1, &raw mut types::sint64, arg_types.as_mut_ptr());
        debug_assert_eq!(status, ffi_status_FFI_OK);

        let code_ptr: unsafe extern "C" fn() = std::mem::transmute(symbol);
        let mut result: i64 = 0;
        let mut arg_value = arg;
        let mut arg_ptrs = [&mut arg_value as *mut i64 as *mut c_void];
        ffi_call(&mut cif, Some(code_ptr), &mut result as *mut i64 as *mut c_void, arg_ptrs.as_mut_ptr());
        result
    }
}

pub fn register(interp: &mut dyn Interpreter) {
    // `LOAD-LIBRARY` ( path-addr tag-addr -- ): open a shared library and remember it under `tag`
    // for later `BIND-FN` calls. `dlopen`/`LoadLibrary` runs arbitrary initializer code, the
    // same trust boundary `libloading::Library::new` documents as `unsafe`.
    native(interp, "LOAD-LIBRARY", |interp| {
        let tag = pop_string(interp)?;
        let path = pop_string(interp)?;

        let mut libraries = LIBRARIES.lock().expect("library registry poisoned");
        if libraries.contains_key(&tag) {
            return Err(interp.trouble(Status::Application, &format!("library tag {} is already loaded", tag)));
        }

        match unsafe { Library::new(&path) } {
            Ok(library) => {
                libraries.insert(tag, library);
                Ok(())
            }
            Err(error) => Err(interp.trouble(Status::Application, &format!("failed to load library {}: {}", path, error))),
        }
    });

    // `BIND-FN` ( tag-addr fn-addr word-addr -- ): look up `fn-addr`'s exported symbol in the
    // library registered under `tag-addr`, and define `word-addr` as a new primitive that calls it
    // (one `i64` argument, one `i64` return).
    native(interp, "BIND-FN", |interp| {
        let word_name = pop_string(interp)?;
        let fn_name = pop_string(interp)?;
        let tag = pop_string(interp)?;

        let pointer = {
            let libraries = LIBRARIES.lock().expect("library registry poisoned");
            let library = libraries
                .get(&tag)
                .ok_or_else(|| interp.trouble(Status::Application, &format!("no library loaded under tag {}", tag)))?;

            let symbol: Symbol<*mut c_void> = unsafe {
                library
                    .get(fn_name.as_bytes())
                    .map_err(|error| interp.trouble(Status::Application, &format!("symbol {} not found: {}", fn_name, error)))?
            };
            *symbol as usize
        };

        interp.add_primitive(
            &word_name,
            false,
            std::rc::Rc::new(move |interp: &mut dyn Interpreter| {
                let arg = pop_int(interp)?;
                let result = call_i64_function(pointer as *mut c_void, arg);
                interp.push(Value::Int(result))
            }),
        );
        Ok(())
    });
}
