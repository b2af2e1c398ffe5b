use std::ffi::{c_char, CStr, CString};
use std::path::Path;

use gdal_sys::CPLErr;

use crate::errors::*;

pub(crate) fn _string(raw_ptr: *const c_char) -> String {
    if raw_ptr.is_null() {
        return String::new();
    }
    let c_str = unsafe { CStr::from_ptr(raw_ptr) };
    c_str.to_string_lossy().into_owned()
}

pub(crate) fn _last_cpl_err(cpl_err_class: CPLErr::Type) -> GazarError {
    let last_err_no = unsafe { gdal_sys::CPLGetLastErrorNo() };
    let last_err_msg = _string(unsafe { gdal_sys::CPLGetLastErrorMsg() });
    unsafe { gdal_sys::CPLErrorReset() };
    GazarError::CplError {
        class: cpl_err_class,
        number: last_err_no,
        msg: last_err_msg,
    }
}

pub(crate) fn _last_null_pointer_err(method_name: &'static str) -> GazarError {
    let last_err_msg = _string(unsafe { gdal_sys::CPLGetLastErrorMsg() });
    unsafe { gdal_sys::CPLErrorReset() };
    GazarError::NullPointer {
        method_name,
        msg: last_err_msg,
    }
}

/// Turns a `CPLErr` return code into a `Result`.
pub(crate) fn _check_cpl(rv: CPLErr::Type) -> Result<()> {
    if rv != CPLErr::CE_None {
        return Err(_last_cpl_err(rv));
    }
    Ok(())
}

pub(crate) fn _path_to_c_string<P: AsRef<Path>>(path: P) -> Result<CString> {
    let path_ref: &Path = path.as_ref();
    let path_str = path_ref.to_string_lossy();
    CString::new(path_str.as_ref()).map_err(Into::into)
}
